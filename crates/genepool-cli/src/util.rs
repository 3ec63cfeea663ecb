use std::{
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;

/// Where a command writes its JSON result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Output<'a> {
    Stdout,
    File(&'a Path),
}

impl<'a> Output<'a> {
    /// Writes to `path` when given, to stdout otherwise.
    pub(crate) fn new(path: Option<&'a Path>) -> Self {
        path.map_or(Output::Stdout, Output::File)
    }

    /// Writes `value` as pretty JSON followed by a newline.
    pub(crate) fn save_json<T>(self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let result = match self {
            Output::Stdout => write_json(&mut io::stdout().lock(), value),
            Output::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                write_json(&mut BufWriter::new(file), value)
            }
        };
        result.with_context(|| format!("Failed to write JSON to {self}"))
    }
}

impl fmt::Display for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("stdout"),
            Output::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn write_json<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads and deserializes a JSON file, naming `file_kind` in error messages.
pub(crate) fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use genepool_training::params::GeneticAlgorithmParams;

    use super::*;

    #[test]
    fn test_saved_params_read_back() {
        let path =
            std::env::temp_dir().join(format!("genepool-params-{}.json", std::process::id()));
        let params = GeneticAlgorithmParams {
            population_size: 12,
            ..GeneticAlgorithmParams::default()
        };
        Output::new(Some(&path)).save_json(&params).unwrap();

        let restored: GeneticAlgorithmParams = read_json_file("parameter", &path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(restored, params);
    }

    #[test]
    fn test_output_destination() {
        assert_eq!(Output::new(None), Output::Stdout);
        assert_eq!(Output::new(None).to_string(), "stdout");
        let path = Path::new("out/model.json");
        assert_eq!(Output::new(Some(path)).to_string(), "out/model.json");
    }

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[1, 2]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("]\n"));
        assert_eq!(serde_json::from_str::<Vec<i32>>(&text).unwrap(), [1, 2]);
    }

    #[test]
    fn test_missing_file_names_kind() {
        let path = Path::new("/nonexistent/params.json");
        let err = read_json_file::<GeneticAlgorithmParams>("parameter", path).unwrap_err();
        assert!(err.to_string().contains("Failed to open parameter file"));
    }
}
