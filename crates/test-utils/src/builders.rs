use sitewatch::config::Options;
use sitewatch::site::SiteConfigMap;

/// A configuration map resolving to the given directories, everything else
/// defaulted.
pub fn site_map(source: &str, destination: &str) -> SiteConfigMap {
    SiteConfigMap {
        source: source.to_string(),
        destination: destination.to_string(),
        ..SiteConfigMap::default()
    }
}

pub fn options_with_config_files(files: &[&str]) -> Options {
    Options {
        config_files: files.iter().map(|f| f.to_string()).collect(),
        ..Options::default()
    }
}

pub fn options_with_extensions(extensions: &[&str]) -> Options {
    Options {
        extensions: extensions.iter().map(|e| e.to_string()).collect(),
        ..Options::default()
    }
}
