//! Loads a Structure Model from JSON and prints its class inventory.
//!
//! Run with: `cargo run --example describe_model -p structura-model -- model.json`

use std::path::PathBuf;

use structura_model::{DataType, MaxCardinality, StructureModel};

fn main() {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: describe_model <model.json>");
        std::process::exit(2);
    };
    let model = match StructureModel::from_path(&path) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!("Structure Model {}", model.psm_iri);
    println!("  Specification: {}", model.owning_specification);
    println!("  Roots:         {}", model.roots.len());
    println!("  Classes:       {}", model.class_count());
    println!("  Properties:    {}", model.property_count());
    println!();

    for class in &model.classes {
        let marker = if model.is_foreign(class) {
            "[imported]"
        } else if class.is_codelist {
            "[codelist]"
        } else {
            ""
        };
        println!("  {:24} {:60} {marker}", class.technical_label, class.psm_iri);
        for prop in &class.properties {
            let max = match prop.cardinality_max {
                MaxCardinality::Bounded(n) => n.to_string(),
                MaxCardinality::Unbounded => "*".to_string(),
            };
            let types: Vec<&str> = prop
                .data_types
                .iter()
                .map(|dt| match dt {
                    DataType::Primitive { iri } => iri.as_str(),
                    DataType::Association { class } => class.as_str(),
                })
                .collect();
            println!(
                "      {:20} [{}..{}] {}",
                prop.technical_label,
                prop.cardinality_min,
                max,
                types.join(" | ")
            );
        }
    }
}
