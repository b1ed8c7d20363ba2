use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

/// Supplies the raw bytes behind a class-path-style resource name, the
/// way a loading context would. Absence is not an error: a name that
/// cannot be opened, for whatever reason, yields `None`.
pub trait ClassResource {
    fn open(&self, path: &str) -> Option<Box<dyn Read + '_>>;
}

/// Maps a fully qualified binary name to the resource path of its class
/// file: `com.example.Foo` becomes `com/example/Foo.class`.
pub fn class_resource_path(class_name: &str) -> String {
    let mut path = class_name.replace('.', "/");
    path.push_str(".class");
    path
}

/// [`ClassResource`] over a list of class-path roots on disk, searched in
/// order.
pub struct DirResources {
    roots: Vec<PathBuf>,
}

impl DirResources {
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }
}

impl ClassResource for DirResources {
    fn open(&self, path: &str) -> Option<Box<dyn Read + '_>> {
        for root in &self.roots {
            match File::open(root.join(Path::new(path))) {
                Ok(file) => return Some(Box::new(file)),
                Err(e) => log::debug!("no {} under {}: {}", path, root.display(), e),
            }
        }
        None
    }
}

/// The implementation class and method a serializable lambda-like value
/// proxies for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaTarget {
    pub impl_class: String,
    pub impl_method: String,
}

/// Probe for values that can reveal the hidden method backing them, in
/// the manner of a serialization-replacement hook. Resolution is
/// best-effort by contract: whatever goes wrong while probing (no hook,
/// refused access, unusable answer) collapses into `None` and never into
/// a reported failure.
pub trait SerializedLambda {
    fn target(&self) -> Option<LambdaTarget>;
}
