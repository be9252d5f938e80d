//! Dependency checking.

use crate::config::ResolverKind;
use crate::requirements::probe::{PathResolver, ShellProbeResolver, ToolResolver};
use crate::requirements::status::{DependencyCheck, DependencyReport, DependencyStatus};
use crate::shell::SystemRunner;

/// Resolve every name in `names`, in order.
///
/// Never fails: an unresolvable tool is recorded as
/// [`DependencyStatus::Missing`].
pub fn check_dependencies<S: AsRef<str>>(
    names: &[S],
    resolver: &dyn ToolResolver,
) -> DependencyReport {
    let checks = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let status = match resolver.resolve(name) {
                Some(path) => DependencyStatus::Found(path),
                None => DependencyStatus::Missing,
            };
            DependencyCheck {
                name: name.to_string(),
                status,
            }
        })
        .collect();

    let report = DependencyReport::new(checks);
    tracing::debug!(
        "Checked {} dependencies, missing: {:?}",
        names.len(),
        report.missing()
    );
    report
}

/// Build the host resolver selected in config.
pub fn system_resolver(kind: ResolverKind) -> Box<dyn ToolResolver> {
    match kind {
        ResolverKind::Path => Box::new(PathResolver::from_env()),
        ResolverKind::Shell => Box::new(ShellProbeResolver::new(SystemRunner)),
    }
}
