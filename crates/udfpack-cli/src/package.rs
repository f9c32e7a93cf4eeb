//! Package command implementation.

use std::fs;
use std::path::Path;

use udfpack_core::{FunctionCompiler, JobId, PythonCompiler, Udf, UdfSettings};

/// Split a `<qualified-name>=<source-file>` argument.
fn parse_udf_arg(arg: &str) -> anyhow::Result<(&str, &Path)> {
    match arg.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => Ok((name, Path::new(path))),
        _ => anyhow::bail!("Expected <qualified-name>=<source-file>, got '{}'", arg),
    }
}

/// Execute the package command.
pub fn execute(
    settings: &UdfSettings,
    job_id: &JobId,
    udf_args: &[String],
) -> anyhow::Result<()> {
    let mut udfs = Vec::with_capacity(udf_args.len());
    for arg in udf_args {
        let (name, path) = parse_udf_arg(arg)?;
        let source = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        udfs.push(Udf::python(name, source));
    }

    let compiler = PythonCompiler::new(settings.clone());
    let paths = if udfs.len() == 1 {
        vec![compiler.package_one(&mut udfs[0], job_id)?]
    } else {
        compiler.package(&udfs, job_id)?
    };

    for path in paths {
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_udf_arg() {
        let (name, path) = parse_udf_arg("a.b.Foo=src/foo.py").unwrap();
        assert_eq!(name, "a.b.Foo");
        assert_eq!(path, Path::new("src/foo.py"));
    }

    #[test]
    fn test_parse_udf_arg_invalid() {
        assert!(parse_udf_arg("a.b.Foo").is_err());
        assert!(parse_udf_arg("=foo.py").is_err());
        assert!(parse_udf_arg("a.b.Foo=").is_err());
    }
}
