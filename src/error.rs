use std::path::PathBuf;
use thiserror::Error;

use crate::schema::SchemaError;

#[derive(Error, Debug)]
pub enum DocsError {
    #[error("failed to walk {}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {name}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("failed to parse partial {name}")]
    Partial {
        name: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("failed to execute template {name}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to assemble template data for {name}")]
    Schema {
        name: String,
        #[source]
        source: SchemaError,
    },
    #[error("template suffix must not be empty")]
    EmptySuffix,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_schema_error_names_template() {
        let err = DocsError::Schema {
            name: "docs/deployers.md.tpl".to_string(),
            source: SchemaError::MissingRoot {
                root: "Config".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "failed to assemble template data for docs/deployers.md.tpl"
        );
        let cause = err.source().map(|source| source.to_string());
        assert_eq!(
            cause.as_deref(),
            Some("root object \"Config\" is not defined in the scope")
        );
    }
}
