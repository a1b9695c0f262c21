use crate::error::ConfigError;
use actix_cors::Cors;
use actix_web::http::{header, uri::Uri};
use log::{info, warn};
use std::{
    fs::File,
    io::{BufRead, BufReader, Error as IOError, ErrorKind},
    path::Path,
};

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsPolicy {
    Permissive,
    Origins(Vec<String>),
}

impl CorsPolicy {
    /// Builds a fresh middleware; actix calls this once per worker.
    pub fn to_cors(&self) -> Cors {
        match self {
            CorsPolicy::Permissive => Cors::permissive(),
            CorsPolicy::Origins(origins) => origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600),
        }
    }
}

/// Reads one origin per line. Blank lines are skipped, invalid ones logged
/// and dropped; it is an error only if nothing usable remains.
pub fn load_and_validate_cors_origins(path: &Path) -> Result<Vec<String>, IOError> {
    let file = File::open(path)?;
    let buf_reader = BufReader::new(file);
    let mut origins = Vec::new();

    for line in buf_reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Uri>() {
            Ok(uri) if uri.scheme().is_some() && uri.host().is_some() => {
                origins.push(line.trim_end_matches('/').to_owned());
            }
            Ok(_) => warn!("CORS origin needs a scheme and host: {}", line),
            Err(e) => warn!("Invalid URI in CORS configuration: {}", e),
        }
    }

    if origins.is_empty() {
        return Err(IOError::new(
            ErrorKind::InvalidData,
            "All CORS lines failed validation.",
        ));
    }

    Ok(origins)
}

/// A missing file means permissive CORS; a file with no valid line is fatal.
pub fn load_cors_policy(path: &Path) -> Result<CorsPolicy, ConfigError> {
    match load_and_validate_cors_origins(path) {
        Ok(origins) => {
            info!("Allowed cors_origins: {:?}", origins);
            Ok(CorsPolicy::Origins(origins))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "{} not found, allowing any origin",
                path.display()
            );
            Ok(CorsPolicy::Permissive)
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            Err(ConfigError::CorsOrigins(path.to_path_buf()))
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, path::PathBuf, process};

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("cors_{}_{}", process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_is_permissive() {
        let path = env::temp_dir().join(format!("cors_{}_absent", process::id()));
        assert_eq!(load_cors_policy(&path).unwrap(), CorsPolicy::Permissive);
    }

    #[test]
    fn keeps_valid_origins_and_skips_the_rest() {
        let path = write_temp(
            "mixed",
            "http://localhost:3000\n\nnot a uri\n/relative\nhttps://shop.example/\n",
        );
        let policy = load_cors_policy(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(
            policy,
            CorsPolicy::Origins(vec![
                "http://localhost:3000".to_owned(),
                "https://shop.example".to_owned(),
            ])
        );
    }

    #[test]
    fn all_invalid_lines_is_an_error() {
        let path = write_temp("invalid", "*\nnope nope\n");
        let err = load_cors_policy(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::CorsOrigins(_)));
    }
}
