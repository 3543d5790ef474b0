use serde::{Deserialize, Serialize};

/// The two renderings of one processed source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Directives kept, inactive code commented out; valid input for another run
    pub editable: String,
    /// All jcyo syntax and inactive code removed
    pub clean: String,
}

impl PipelineOutput {
    pub fn new(editable: String, clean: String) -> Self {
        Self { editable, clean }
    }

    /// Whether processing left `source` untouched
    pub fn is_unchanged(&self, source: &str) -> bool {
        self.editable == source
    }
}
