//! Property tests for label and logical-id derivation.

use proptest::prelude::*;

use pingln_infra::resources::dns::record_label;
use pingln_infra::synth::LogicalId;

proptest! {
    /// PROPERTY: deriving a logical id from any free-form label succeeds and
    /// yields a purely alphanumeric id ending in the suffix.
    #[test]
    fn property_from_label_always_yields_valid_id(label in ".{0,40}") {
        let id = LogicalId::from_label(&label, "AliasRecord")
            .expect("suffix keeps the id non-empty");
        prop_assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        prop_assert!(id.as_str().ends_with("AliasRecord"));
    }

    /// PROPERTY: the record label is the text before the first separator -
    /// never contains one, and is always a prefix of the input.
    #[test]
    fn property_record_label_is_separator_free_prefix(domain in "[a-z0-9.\\-]{0,60}") {
        let label = record_label(&domain);
        prop_assert!(!label.contains('.'));
        prop_assert!(domain.starts_with(label));
    }
}
