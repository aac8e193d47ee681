use log::debug;
use minijinja::Environment;

use crate::error::DocsError;

/// Namespace bundled fragments are registered under.
pub const PARTIALS_DIR: &str = "partials/";

/// File suffix of the bundled fragment sources.
pub const PARTIAL_SUFFIX: &str = ".md.j2";

/// Fragments compiled into the binary, as `(file name, source)`.
pub static BUNDLED: &[(&str, &str)] = &[
    ("object.md.j2", include_str!("partials/object.md.j2")),
    ("property.md.j2", include_str!("partials/property.md.j2")),
    ("scope.md.j2", include_str!("partials/scope.md.j2")),
    ("type_name.md.j2", include_str!("partials/type_name.md.j2")),
];

/// Maps a fragment file name to the name it is registered under:
/// `object.md.j2` becomes `partials/object`.
pub fn registered_name(file_name: &str) -> String {
    template_name(file_name.strip_suffix(PARTIAL_SUFFIX).unwrap_or(file_name))
}

/// Maps the name a template passes to `partial()` to its registered name.
///
/// Inside a fragment the argument of `partial()` is available as `data`, and
/// the fields of a map argument are also top-level variables.
pub fn template_name(partial: &str) -> String {
    format!("{PARTIALS_DIR}{partial}")
}

/// Parses every bundled fragment into `env`.
pub fn register(env: &mut Environment<'static>) -> Result<(), DocsError> {
    for (file_name, source) in BUNDLED {
        let name = registered_name(file_name);
        debug!("Registering partial {}", name);
        env.add_template_owned(name.clone(), *source)
            .map_err(|source| DocsError::Partial { name, source })?;
    }
    Ok(())
}
