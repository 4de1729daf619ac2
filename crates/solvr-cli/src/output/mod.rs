use serde::Serialize;

use crate::cli::OutputFormat;

pub mod text;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Text => Ok(text::render_value(&serde_json::to_value(value)?)),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print one REPL event. Text mode prints `line`; the JSON modes print
/// `value` on a single line so the stream stays one event per line.
pub fn event<T: Serialize>(line: &str, value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{line}"),
        OutputFormat::Json | OutputFormat::Raw => println!("{}", serde_json::to_string(value)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Sample {
        count: u32,
        name: &'static str,
    }

    #[test]
    fn json_is_pretty_and_raw_is_compact() {
        let sample = Sample {
            count: 2,
            name: "brief",
        };
        assert_eq!(
            render(&sample, OutputFormat::Raw).unwrap(),
            r#"{"count":2,"name":"brief"}"#
        );
        assert!(render(&sample, OutputFormat::Json).unwrap().contains('\n'));
    }

    #[test]
    fn text_lists_fields() {
        let sample = Sample {
            count: 2,
            name: "brief",
        };
        assert_eq!(
            render(&sample, OutputFormat::Text).unwrap(),
            "count: 2\nname: brief"
        );
    }
}
