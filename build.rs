#![forbid(unsafe_code)]

use std::path::Path;

fn main() {
    // Source tarballs and vendored builds have no .git directory; embed
    // placeholders there instead of failing the build.
    if Path::new(".git").exists() {
        build_data::set_GIT_BRANCH();
        build_data::set_GIT_COMMIT_SHORT();
        build_data::set_GIT_DIRTY();
        build_data::set_SOURCE_TIMESTAMP();  // Using BUILD_TIMESTAMP makes build unreproducible.
    } else {
        println!("cargo:rustc-env=GIT_BRANCH=unknown");
        println!("cargo:rustc-env=GIT_COMMIT_SHORT=unknown");
        println!("cargo:rustc-env=GIT_DIRTY=unknown");
        println!("cargo:rustc-env=SOURCE_TIMESTAMP=unknown");
    }
    build_data::set_RUSTC_VERSION();

    // Tells cargo not to rebuild build.rs during debug builds when other files change.
    // This speeds up development builds.
    //build_data::no_debug_rebuilds();
}
