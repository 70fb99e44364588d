#![forbid(unsafe_code)]

use path_absolutize::Absolutize;
use std::ops::Deref;
use std::path::Path;

use poem::Request;

use log::{debug, LevelFilter};

// ***************************************************************************
// GENERAL PUBLIC FUNCTIONS
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_absolute_path:
// ---------------------------------------------------------------------------
/** Replace tilde (~) and environment variable values in a path name and
 * then construct the absolute path name.  The difference between
 * absolutize and standard canonicalize methods is that absolutize does not
 * care about whether the file exists and what the file really is.
 *
 * Any failure along the way returns the original path unchanged.
 */
pub fn get_absolute_path(path: &str) -> String {
    // Replace ~ and environment variable values if possible.
    // On error, return the string version of the original path.
    let s = match shellexpand::full(path) {
        Ok(x) => x,
        Err(_) => return path.to_owned(),
    };

    // Convert to absolute path if necessary.
    // Return original input on error.
    let p = Path::new(s.deref());
    let p1 = match p.absolutize() {
        Ok(x) => x,
        Err(_) => return path.to_owned(),
    };
    let p2 = match p1.to_str() {
        Some(x) => x,
        None => return path.to_owned(),
    };

    p2.to_owned()
}

// ***************************************************************************
//                                  Traits
// ***************************************************************************
pub trait RequestDebug {
    type Req;
    fn get_request_info(&self) -> String;
}

// ---------------------------------------------------------------------------
// debug_request:
// ---------------------------------------------------------------------------
// Dump http request information to the log.
pub fn debug_request(http_req: &Request, req: &impl RequestDebug) {
    // Check that debug or higher logging is in effect.
    let level = log::max_level();
    if level < LevelFilter::Debug {
        return;
    }

    // Accumulate the output.
    let mut s = "\n".to_string();

    // Restate the URI.
    let uri = http_req.uri();
    s += format!("  URI: {:?}\n", uri).as_str();

    // Accumulate the headers
    let it = http_req.headers().iter();
    for v in it {
        s += format!("  Header: {} = {:?} \n", v.0, v.1).as_str();
    }

    // List query parameters.
    if let Some(q) = uri.query() {
        s += format!("  Query Parameters: {:?}\n", q).as_str();
    } else {
        s += "  * No Query Parameters\n";
    }

    // Add the request's information.
    s += req.get_request_info().as_str();

    // Write the single log record.
    debug!("{}", s);
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::get_absolute_path;

    #[test]
    fn tilde_paths_become_absolute() {
        let p = get_absolute_path("~/config");
        assert!(p.starts_with('/'), "expected absolute path, got {}", p);
        assert!(!p.contains('~'), "tilde not expanded in {}", p);
    }

    #[test]
    fn relative_paths_become_absolute() {
        let p = get_absolute_path("logs/current");
        assert!(p.starts_with('/'), "expected absolute path, got {}", p);
        assert!(p.ends_with("/logs/current"), "unexpected suffix in {}", p);
    }

    #[test]
    fn absolute_paths_are_unchanged() {
        assert_eq!(get_absolute_path("/var/tmp"), "/var/tmp");
    }
}
