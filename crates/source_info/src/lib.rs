//! Recovers "where was this defined" answers for already-compiled,
//! loaded classes by scanning their raw class file bytes, without a
//! debugger attached. The scan itself lives in `whence-class_scan`; this
//! crate locates the bytes and renders the answer.

mod locator;

pub use locator::{class_resource_path, ClassResource, DirResources, LambdaTarget, SerializedLambda};
pub use whence_class_scan::SourceInfo;

/// Source information for a named class, scanning all of its methods.
pub fn source_info(loader: &dyn ClassResource, class_name: &str) -> SourceInfo {
    match loader.open(&class_resource_path(class_name)) {
        Some(r) => SourceInfo::scan(r, None),
        None => SourceInfo::NoSourceInfo,
    }
}

/// Source information for a lambda-like value, narrowed to the single
/// method backing it. A value that cannot be probed, or whose
/// implementation class cannot be found, yields
/// [`SourceInfo::NoSourceInfo`].
pub fn lambda_source_info(loader: &dyn ClassResource, value: &dyn SerializedLambda) -> SourceInfo {
    let Some(target) = value.target() else {
        return SourceInfo::NoSourceInfo;
    };
    log::debug!(
        "lambda resolves to {}.{}",
        target.impl_class,
        target.impl_method
    );

    match loader.open(&class_resource_path(&target.impl_class)) {
        Some(r) => SourceInfo::scan(r, Some(&target.impl_method)),
        None => SourceInfo::NoSourceInfo,
    }
}

/// One-line rendering of a class name together with what was found for
/// it. With a line range the enclosing package stands in for the class
/// name, so the output reads like a stack frame location.
pub fn describe(class_name: &str, info: &SourceInfo) -> String {
    match info {
        SourceInfo::NoSourceInfo => class_name.to_owned(),
        SourceInfo::UnknownSourceFormat { reason } => format!("{} ({})", class_name, reason),
        SourceInfo::SourceFile { file } => format!("{} ({})", class_name, file),
        SourceInfo::SourceFileLines { file, from, to } => {
            let package = class_name.rsplit_once('.').map(|(p, _)| p).unwrap_or("");
            let location = if package.is_empty() {
                file.clone()
            } else {
                format!("{}/{}", package, file)
            };
            if from == to {
                format!("{}:{}", location, from)
            } else {
                format!("{}:{}-{}", location, from, to)
            }
        }
    }
}
