use std::fmt::Display;

use serde::Serialize;

/// Summary of what the transform did to one module.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoizeReport {
    /// Render functions found, including ones synthesized by hoisting.
    pub render_functions: usize,
    /// Render functions that received a binder.
    pub rewritten_functions: usize,
    pub bind_sites: usize,
    pub hoisted_closures: usize,
    pub import_inserted: bool,
}

impl MemoizeReport {
    pub fn is_unchanged(&self) -> bool {
        !self.import_inserted
    }
}

impl Display for MemoizeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} render functions rewritten ({} bind calls, {} hoisted closures)",
            self.rewritten_functions, self.render_functions, self.bind_sites, self.hoisted_closures
        )
    }
}
