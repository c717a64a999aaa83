//! Property: the canonical string of any accepted pipeline parses back into
//! the same graph.

use nfweave::catalog::{ProcessCatalog, ProcessMetadata, Role};
use nfweave::parse::parse_pipeline;
use proptest::prelude::*;

const NAMES: [&str; 5] = ["trim", "qc", "asm", "polish", "type"];

/// Every process repeatable and type-compatible, so any grammatical string
/// is accepted.
fn permissive_catalog() -> ProcessCatalog {
    ProcessCatalog::from_processes(
        NAMES
            .iter()
            .map(|name| ProcessMetadata {
                name: name.to_string(),
                input: vec!["fastq".into()],
                output: "fastq".into(),
                repeatable: true,
                role: Role::Process,
                description: String::new(),
                template: None,
            })
            .collect(),
    )
    .expect("catalog should load")
}

#[derive(Debug, Clone)]
enum Item {
    Name(usize),
    Group(Vec<Vec<usize>>),
}

fn item() -> impl Strategy<Value = Item> {
    let name = 0..NAMES.len();
    prop_oneof![
        name.clone().prop_map(Item::Name),
        prop::collection::vec(prop::collection::vec(name, 1..4), 1..4).prop_map(Item::Group),
    ]
}

/// Render with either tight or padded delimiters.
fn render(items: &[Item], padded: bool) -> String {
    let (open, bar, close) = if padded { ("( ", " | ", " )") } else { ("(", "|", ")") };
    items
        .iter()
        .map(|item| match item {
            Item::Name(i) => NAMES[*i].to_string(),
            Item::Group(lanes) => {
                let lanes: Vec<String> = lanes
                    .iter()
                    .map(|lane| {
                        lane.iter()
                            .map(|i| NAMES[*i])
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect();
                format!("{open}{}{close}", lanes.join(bar))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

proptest! {
    #[test]
    fn canonical_form_round_trips(
        items in prop::collection::vec(item(), 1..6),
        padded in any::<bool>(),
    ) {
        let catalog = permissive_catalog();
        let graph = parse_pipeline(&render(&items, padded), &catalog).unwrap();
        let reparsed = parse_pipeline(&graph.to_string(), &catalog).unwrap();
        prop_assert_eq!(&reparsed, &graph);
        prop_assert_eq!(reparsed.to_string(), graph.to_string());
    }
}
