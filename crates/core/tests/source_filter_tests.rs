use restorer_core::{FilterConfig, SourceFilter};

#[test]
fn keeps_project_files() {
    let filter = SourceFilter::default();
    assert!(filter.accepts("webpack:///src/a.js"));
    assert!(filter.accepts("webpack:///./components/App.tsx"));
    assert!(filter.accepts("lib/util.js"));
}

#[test]
fn drops_bundler_internals_regardless_of_prefix() {
    let filter = SourceFilter::default();
    assert!(!filter.accepts("webpack:///webpack/bootstrap"));
    assert!(!filter.accepts("webpack:///webpack/runtime/define property getters"));
    assert!(!filter.accepts("webpack/bootstrap 1a2b3c"));
    assert!(!filter.accepts("webpack:///(webpack)/buildin/module.js"));
}

#[test]
fn segment_match_not_substring() {
    let filter = SourceFilter::default();
    assert!(filter.accepts("webpack:///src/webpack-config.js"));
    assert!(filter.accepts("webpack:///src/my_node_modules/x.js"));
}

#[test]
fn dependency_directories_are_configurable() {
    let filter = SourceFilter::default();
    assert!(!filter.accepts("webpack:///node_modules/dep/b.js"));
    assert!(!filter.accepts("webpack:///./src/../node_modules/react/index.js"));

    let config = FilterConfig {
        include_dependency_directories: true,
        ..FilterConfig::default()
    };
    let filter = SourceFilter::new(&config);
    assert!(filter.accepts("webpack:///node_modules/dep/b.js"));
    assert!(!filter.accepts("webpack:///webpack/bootstrap"));
}

#[test]
fn extra_segments_and_backslashes() {
    let mut config = FilterConfig::default();
    config.excluded_segments.push("vendor".to_string());
    let filter = SourceFilter::new(&config);
    assert!(!filter.accepts("webpack:///src/vendor/jquery.js"));
    assert!(!filter.accepts(r"C:\work\app\node_modules\x.js"));
}
