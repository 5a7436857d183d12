use crate::types::OutputFormat;
use anyhow::Result;
use runstream_normalize::all_aliases;
use serde_json::json;

pub fn handle(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = all_aliases()
                .iter()
                .map(|(literal, op)| {
                    json!({
                        "type": literal,
                        "canonical": op.canonical_type(),
                        "origin": op.origin().as_str(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Plain => {
            for (literal, op) in all_aliases() {
                println!("{:<32} {:<28} {}", literal, op.canonical_type(), op.origin().as_str());
            }
        }
    }

    Ok(())
}
