use std::path::Path;

use restorer_core::{PathResolver, ResolveError, ResolverConfig};

#[test]
fn strips_webpack_prefix() {
    let resolver = PathResolver::default();
    let root = Path::new("output");
    assert_eq!(
        resolver.resolve("webpack:///src/a.js", root).unwrap(),
        Path::new("output/src/a.js")
    );
    assert_eq!(
        resolver.resolve("webpack:///./foo/bar.js", root).unwrap(),
        Path::new("output/foo/bar.js")
    );
    assert_eq!(
        resolver.resolve("webpack://namespace/./baz.js", root).unwrap(),
        Path::new("output/namespace/baz.js")
    );
}

#[test]
fn absolute_paths_stay_under_root() {
    let resolver = PathResolver::default();
    let root = Path::new("out");
    assert_eq!(
        resolver.resolve("/home/me/project/index.js", root).unwrap(),
        Path::new("out/home/me/project/index.js")
    );
    assert_eq!(
        resolver.resolve(r"src\win\file.js", root).unwrap(),
        Path::new("out/src/win/file.js")
    );
}

#[test]
fn rejects_parent_traversal() {
    let resolver = PathResolver::default();
    let root = Path::new("out");
    for id in [
        "webpack:///../../etc/passwd",
        "../secret.js",
        "webpack:///src/../../x.js",
        "webpack:///src/./..",
        r"src\..\..\x.js",
        "src/../a.js",
    ] {
        let err = resolver.resolve(id, root).unwrap_err();
        assert!(matches!(err, ResolveError::ParentTraversal(_)), "{id}");
    }
}

#[test]
fn rejects_empty_and_odd_segments() {
    let resolver = PathResolver::default();
    let root = Path::new("out");
    assert!(matches!(resolver.resolve("", root), Err(ResolveError::Empty(_))));
    assert!(matches!(resolver.resolve("webpack:///", root), Err(ResolveError::Empty(_))));
    assert!(matches!(resolver.resolve("./.", root), Err(ResolveError::Empty(_))));
    assert!(matches!(
        resolver.resolve(r"C:\src\a.js", root),
        Err(ResolveError::InvalidSegment { .. })
    ));
    assert!(matches!(
        resolver.resolve("src/a\0.js", root),
        Err(ResolveError::InvalidSegment { .. })
    ));
}

#[test]
fn custom_prefixes() {
    let config = ResolverConfig {
        virtual_prefixes: vec!["webpack://".into(), "vite://".into()],
    };
    let resolver = PathResolver::new(&config);
    let root = Path::new("out");
    assert_eq!(
        resolver.resolve("vite:///src/main.ts", root).unwrap(),
        Path::new("out/src/main.ts")
    );
}

#[test]
fn deterministic() {
    let resolver = PathResolver::default();
    let root = Path::new("out");
    let a = resolver.resolve("webpack:///src/a.js", root);
    let b = resolver.resolve("webpack:///src/a.js", root);
    assert_eq!(a, b);
}
