use crate::rules::{self, ImportError, Rule};

/// One editable rule row. Rows may be blank; only rows with a non-blank
/// pattern make it into a collected rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub antigo: String,
    pub novo: String,
}

/// What a successful import did to the store.
#[derive(Debug, PartialEq)]
pub enum ImportOutcome {
    /// One row per valid element, in document order.
    Imported(usize),
    /// The document was an empty list; a single blank row was inserted.
    EmptyFile,
}

/// Ordered rule rows. All mutation goes through these methods so the rest
/// of the program can be exercised without any rendered surface.
#[derive(Debug, Default)]
pub struct RuleStore {
    rows: Vec<Row>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add_empty(&mut self) {
        self.rows.push(Row::default());
    }

    /// Removes exactly the given row. Does not backfill a blank row when
    /// the last one goes.
    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.rows.len() {
            self.rows.remove(index);
            true
        } else {
            false
        }
    }

    /// Stores the value exactly as given; trimming happens at collection.
    pub fn set_antigo(&mut self, index: usize, value: &str) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.antigo = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_novo(&mut self, index: usize, value: &str) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.novo = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Rows in display order. `antigo` is trimmed and blank rows dropped;
    /// `novo` is taken as-is.
    pub fn collect(&self) -> Vec<Rule> {
        self.rows
            .iter()
            .filter_map(|row| {
                let antigo = row.antigo.trim();
                (!antigo.is_empty()).then(|| Rule {
                    antigo: antigo.to_string(),
                    novo: row.novo.clone(),
                })
            })
            .collect()
    }

    /// Replaces the rows with the rules from a JSON document.
    ///
    /// The rows are cleared before element validation begins, so a document
    /// that parses as a list but yields no valid rules leaves the store
    /// with zero rows. Parse and shape errors leave the rows untouched.
    pub fn import_document(&mut self, contents: &str) -> Result<ImportOutcome, ImportError> {
        let items = rules::parse_document(contents)?;
        self.rows.clear();

        let mut imported = 0;
        for item in &items {
            if let Some(rule) = rules::validate_element(item) {
                self.rows.push(Row {
                    antigo: rule.antigo,
                    novo: rule.novo,
                });
                imported += 1;
            }
        }

        if imported == 0 && !items.is_empty() {
            return Err(ImportError::NoValidRules);
        }
        if imported == 0 {
            self.add_empty();
            return Ok(ImportOutcome::EmptyFile);
        }
        Ok(ImportOutcome::Imported(imported))
    }
}

/// Escapes a value for display inside a double-quoted cell. Display only;
/// the stored value stays exactly as typed.
pub fn escape_display(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
