//! Help text derived from the command registry

use crate::application::messaging::format::block_quote;
use crate::domain::entities::CommandRegistry;

const TAB_WIDTH: usize = 8;

/// Produces the reply for `help`.
#[derive(Debug, Clone, Default)]
pub struct HelpService {
    custom: Option<String>,
}

impl HelpService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the generated table with `text`, returned verbatim.
    pub fn with_override(text: impl Into<String>) -> Self {
        Self {
            custom: Some(text.into()),
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.custom.is_some()
    }

    pub fn help_text(&self, registry: &CommandRegistry) -> String {
        match &self.custom {
            Some(text) => text.clone(),
            None => render_table(registry),
        }
    }
}

/// Two-column `Command`/`Description` table, tab aligned, block quoted.
pub fn render_table(registry: &CommandRegistry) -> String {
    let mut rows = vec![("Command", "Description")];
    rows.extend(registry.entries().map(|(trigger, command)| (trigger, command.description())));

    let widest = rows.iter().map(|(t, _)| t.chars().count()).max().unwrap_or(0);
    let cell = (widest / TAB_WIDTH + 1) * TAB_WIDTH;

    let mut table = String::new();
    for (trigger, description) in rows {
        let pad = cell - trigger.chars().count();
        table.push_str(trigger);
        table.push_str(&"\t".repeat(pad.div_ceil(TAB_WIDTH)));
        table.push_str(description);
        table.push('\n');
    }
    block_quote(&table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::CommandError;
    use crate::domain::entities::Command;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Described(&'static str);

    #[async_trait]
    impl Command for Described {
        fn description(&self) -> &str {
            self.0
        }

        fn show_result(&self) -> bool {
            true
        }

        async fn run(&self, _conversation: &str, _args: &[String]) -> Result<String, CommandError> {
            Ok(String::new())
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register("toggle-dryrun", Arc::new(Described("Toggle dry run"))).unwrap();
        registry.register("date", Arc::new(Described("Show the current date"))).unwrap();
        registry.register("pause", Arc::new(Described("Pause any future builds"))).unwrap();
        registry
    }

    #[test]
    fn test_table_layout() {
        let mut registry = CommandRegistry::new();
        registry.register("date", Arc::new(Described("Show the current date"))).unwrap();
        assert_eq!(
            render_table(&registry),
            "```\nCommand\tDescription\ndate\tShow the current date\n```"
        );
    }

    #[test]
    fn test_columns_align_on_tab_stops() {
        let text = render_table(&registry());
        assert!(text.contains("Command\t\tDescription\n"));
        assert!(text.contains("date\t\tShow the current date\n"));
        assert!(text.contains("toggle-dryrun\tToggle dry run\n"));
    }

    #[test]
    fn test_descriptions_once_in_order() {
        let text = HelpService::new().help_text(&registry());
        let descriptions = ["Show the current date", "Pause any future builds", "Toggle dry run"];
        let mut last = 0;
        for description in descriptions {
            assert_eq!(text.matches(description).count(), 1);
            let at = text.find(description).unwrap();
            assert!(at > last);
            last = at;
        }
        assert!(!text.contains("help"));
    }

    #[test]
    fn test_override_verbatim() {
        let help = HelpService::with_override("custom\thelp");
        assert!(help.is_overridden());
        assert_eq!(help.help_text(&registry()), "custom\thelp");
    }

    #[test]
    fn test_empty_registry() {
        assert_eq!(render_table(&CommandRegistry::new()), "```\nCommand\tDescription\n```");
    }
}
