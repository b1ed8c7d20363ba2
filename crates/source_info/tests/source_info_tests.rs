use std::{collections::HashMap, io::Read};

use whence_source_info::{
    class_resource_path, describe, lambda_source_info, source_info, ClassResource, LambdaTarget,
    SerializedLambda, SourceInfo,
};

/// In-memory stand-in for a class path.
#[derive(Default)]
struct MapResources {
    resources: HashMap<String, Vec<u8>>,
}

impl MapResources {
    fn with(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.resources.insert(path.to_owned(), bytes);
        self
    }
}

impl ClassResource for MapResources {
    fn open(&self, path: &str) -> Option<Box<dyn Read + '_>> {
        let bytes = self.resources.get(path)?;
        Some(Box::new(bytes.as_slice()))
    }
}

struct Lambda(Option<LambdaTarget>);

impl SerializedLambda for Lambda {
    fn target(&self) -> Option<LambdaTarget> {
        self.0.clone()
    }
}

/// A class whose only detail of interest is its SourceFile attribute:
/// constant pool of two Utf8 entries, no methods, one class attribute.
fn class_with_source_file(file: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(0xCAFEBABEu32.to_be_bytes());
    out.extend([0, 0, 0, 52]); // version 52.0
    out.extend(3u16.to_be_bytes()); // constant_pool_count
    out.push(1);
    out.extend(10u16.to_be_bytes());
    out.extend(b"SourceFile");
    out.push(1);
    out.extend((file.len() as u16).to_be_bytes());
    out.extend(file.as_bytes());
    out.extend([0; 10]); // access_flags .. fields_count
    out.extend(0u16.to_be_bytes()); // methods_count
    out.extend(1u16.to_be_bytes()); // attributes_count
    out.extend(1u16.to_be_bytes()); // attribute_name_index
    out.extend(2u32.to_be_bytes());
    out.extend(2u16.to_be_bytes()); // sourcefile_index
    out
}

#[test]
fn test_class_resource_path() {
    assert_eq!(
        "com/example/Foo.class",
        class_resource_path("com.example.Foo")
    );
    assert_eq!("Foo.class", class_resource_path("Foo"));
}

#[test]
fn test_source_info_reads_through_the_loader() {
    let loader = MapResources::default().with(
        "com/example/Foo.class",
        class_with_source_file("Foo.scala"),
    );
    assert_eq!(
        SourceInfo::SourceFile {
            file: "Foo.scala".into()
        },
        source_info(&loader, "com.example.Foo")
    );
}

#[test]
fn test_missing_class_is_no_source_info() {
    let loader = MapResources::default();
    assert_eq!(
        SourceInfo::NoSourceInfo,
        source_info(&loader, "com.example.Missing")
    );
}

#[test]
fn test_unprobeable_lambda_is_no_source_info() {
    let loader = MapResources::default().with(
        "com/example/Foo.class",
        class_with_source_file("Foo.scala"),
    );
    assert_eq!(
        SourceInfo::NoSourceInfo,
        lambda_source_info(&loader, &Lambda(None))
    );
}

#[test]
fn test_lambda_target_is_located_and_scanned() {
    let loader = MapResources::default().with(
        "com/example/Foo.class",
        class_with_source_file("Foo.scala"),
    );
    let lambda = Lambda(Some(LambdaTarget {
        impl_class: "com.example.Foo".into(),
        impl_method: "lambda$handle$0".into(),
    }));
    assert_eq!(
        SourceInfo::SourceFile {
            file: "Foo.scala".into()
        },
        lambda_source_info(&loader, &lambda)
    );
}

#[test]
fn test_describe_without_info() {
    assert_eq!(
        "com.example.Foo",
        describe("com.example.Foo", &SourceInfo::NoSourceInfo)
    );
}

#[test]
fn test_describe_unknown_format() {
    assert_eq!(
        "com.example.Foo (Premature end of class data)",
        describe(
            "com.example.Foo",
            &SourceInfo::UnknownSourceFormat {
                reason: "Premature end of class data".into()
            }
        )
    );
}

#[test]
fn test_describe_source_file_only() {
    assert_eq!(
        "com.example.Foo (Foo.scala)",
        describe(
            "com.example.Foo",
            &SourceInfo::SourceFile {
                file: "Foo.scala".into()
            }
        )
    );
}

#[test]
fn test_describe_line_range() {
    assert_eq!(
        "com.example/Foo.scala:42-47",
        describe(
            "com.example.Foo",
            &SourceInfo::SourceFileLines {
                file: "Foo.scala".into(),
                from: 42,
                to: 47
            }
        )
    );
    assert_eq!(
        "com.example/Foo.scala:42",
        describe(
            "com.example.Foo",
            &SourceInfo::SourceFileLines {
                file: "Foo.scala".into(),
                from: 42,
                to: 42
            }
        )
    );
}

#[test]
fn test_describe_line_range_without_package() {
    assert_eq!(
        "Foo.scala:3",
        describe(
            "Foo",
            &SourceInfo::SourceFileLines {
                file: "Foo.scala".into(),
                from: 3,
                to: 3
            }
        )
    );
}
