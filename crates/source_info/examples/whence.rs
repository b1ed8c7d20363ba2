use std::{env, fs, path::Path};

use whence_source_info::{describe, source_info, DirResources};

fn main() {
    pretty_env_logger::init();

    let root = env::args().nth(1).expect("usage: whence <class-dir>");
    let loader = DirResources::new([root.as_str()]);

    let mut names = Vec::new();
    collect_class_names(Path::new(&root), "", &mut names);
    names.sort();

    for name in names {
        println!("{}", describe(&name, &source_info(&loader, &name)));
    }
}

fn collect_class_names(dir: &Path, prefix: &str, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        log::warn!("cannot read {}", dir.display());
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        if path.is_dir() {
            let nested = if prefix.is_empty() {
                stem.to_owned()
            } else {
                format!("{}.{}", prefix, stem)
            };
            collect_class_names(&path, &nested, out);
        } else if path.extension().map_or(false, |e| e == "class") {
            if prefix.is_empty() {
                out.push(stem.to_owned());
            } else {
                out.push(format!("{}.{}", prefix, stem));
            }
        }
    }
}
