/// Example: Render a few aggregation expressions as Extended JSON
///
/// Usage: cargo run --example render_expressions [config_file]

use aggexpr::operators::{
    add, date_trunc, filter_with, gte, if_null, let_vars, multiply, sort_array, sort_by, switch,
    SortOrder,
};
use aggexpr::{DateUnit, Encoder, EncoderConfig, Operator};
use std::env;

fn main() {
    env_logger::Builder::from_default_env().init();

    // Load encoder settings from the command line, or use the defaults
    let config = match env::args().nth(1) {
        Some(path) => EncoderConfig::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Failed to load config '{}': {}", path, e);
            std::process::exit(1);
        }),
        None => EncoderConfig::default(),
    };
    let encoder = Encoder::from_config(&config);

    let expressions: Vec<(&str, Operator)> = vec![
        (
            "line total",
            let_vars(
                [("subtotal", multiply(["$price", "$qty"]))],
                add(["$$subtotal", "$shipping"]),
            ),
        ),
        (
            "large items",
            filter_with("$items", gte("$$item.qty", 100), Some("item".into()), Some(5.into())),
        ),
        (
            "size label",
            switch()
                .on_case(gte("$qty", 250))
                .then("large")
                .on_case(gte("$qty", 50))
                .then("medium")
                .build_with_default("small"),
        ),
        ("order month", date_trunc("$orderDate", DateUnit::Month)),
        ("display name", if_null(["$nickname", "$name"], "anonymous")),
        (
            "ranked team",
            sort_array(
                "$team",
                sort_by([("score", SortOrder::Descending), ("name", SortOrder::Ascending)]),
            ),
        ),
    ];

    println!("Rendering in {:?} mode\n", config.json_mode);
    for (name, expression) in &expressions {
        match expression.to_json_string_with(&encoder, config.json_mode) {
            Ok(json) => println!("{}:\n  {}", name, json),
            Err(e) => {
                eprintln!("✗ Failed to render '{}': {}", name, e);
                std::process::exit(1);
            }
        }
    }
}
