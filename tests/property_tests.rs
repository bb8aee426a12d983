use proptest::prelude::*;
use psconvert::{Converter, Dialect, Direction, MappingStore, SourceKind, SuggestionEngine};
use std::sync::Arc;

fn store() -> Arc<MappingStore> {
    Arc::new(MappingStore::new().unwrap())
}

#[test]
fn test_every_basic_mapping_starts_with_its_template() {
    let store = store();
    let converter = Converter::new(Arc::clone(&store));
    for (cmd, template) in store.source_commands(Dialect::Cmd) {
        let result = converter.translator().convert_one(cmd, Dialect::Cmd);
        assert!(
            result.output.starts_with(template) || result.kind == SourceKind::LocalPattern,
            "{cmd} -> {} (expected prefix {template})",
            result.output
        );
    }
}

proptest! {
    #[test]
    fn prop_suggestions_are_bounded(input in "[a-z]{0,12}") {
        let engine = SuggestionEngine::new(store());
        let suggestions = engine.suggest(&input);
        prop_assert!(suggestions.len() <= 5);
        prop_assert!(suggestions.iter().all(|s| s.similarity_percent > 50));
        if input.is_empty() {
            prop_assert!(suggestions.is_empty());
        }
    }

    #[test]
    fn prop_round_trip_terminates(input in "[ -~]{0,60}") {
        let converter = Converter::new(store());
        let forward = converter.convert(&input, Direction::CmdToPowerShell);
        let back = converter.convert(&forward.output, Direction::PowerShellToCmd);
        if input.trim().is_empty() {
            prop_assert_eq!(forward.kind, SourceKind::Empty);
        }
        prop_assert!(back.kind == SourceKind::Empty || back.target == Some(Dialect::Cmd));
    }

    #[test]
    fn prop_auto_direction_never_panics(input in "\\PC{0,80}") {
        let converter = Converter::new(store());
        let result = converter.convert(&input, Direction::Auto);
        prop_assert_eq!(result.kind == SourceKind::Empty, result.output.is_empty() && result.source.is_none());
    }
}
