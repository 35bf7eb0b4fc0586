use dialoguer::{theme::ColorfulTheme, Select};
use shared::{core::Selector, error::EcsnvError};

const VISIBLE_ROWS: usize = 25;

/// Arrow-key list on stderr; Esc or q cancels.
pub(crate) struct TerminalSelector {
    theme: ColorfulTheme,
}

impl TerminalSelector {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Selector for TerminalSelector {
    fn select(&self, label: &str, items: &[String]) -> Result<Option<String>, EcsnvError> {
        if items.is_empty() {
            return Ok(None);
        }

        let index = Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(items)
            .default(0)
            .max_length(VISIBLE_ROWS)
            .interact_opt()
            .map_err(|e| EcsnvError::Prompt(e.to_string()))?;

        Ok(index.map(|i| items[i].clone()))
    }
}
