extern crate bindgen;
extern crate cmake;

use cmake::Config;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let target = env::var("TARGET").unwrap();
    let out_dir = env::var("OUT_DIR").unwrap();
    let xgb_root = Path::new(&out_dir).join("xgboost");

    println!("cargo:rerun-if-changed=wrapper.h");
    println!("cargo:rerun-if-env-changed=XILINX_XRT");
    println!("cargo:rerun-if-env-changed=CORAL_HOME");

    // copy the vendored fork into OUT_DIR so CMake never writes into the source tree
    if !xgb_root.exists() {
        Command::new("cp")
            .args(["-r", "xgboost", xgb_root.to_str().unwrap()])
            .status()
            .unwrap_or_else(|e| {
                panic!("Failed to copy ./xgboost to {}: {}", xgb_root.display(), e);
            });
    }

    let mut dst = Config::new(&xgb_root);
    let dst = dst.uses_cxx11().define("BUILD_STATIC_LIB", "ON");

    // the two FPGA updaters register the same "grow_fpga" maker, only one may be compiled in
    #[cfg(all(feature = "fpga", feature = "coral"))]
    compile_error!("features `fpga` and `coral` are mutually exclusive");

    #[cfg(feature = "fpga")]
    let dst = dst.define("PLUGIN_INACCEL", "ON").define("INACCEL_RUNTIME", "OPENCL");

    #[cfg(feature = "coral")]
    let dst = dst.define("PLUGIN_INACCEL", "ON").define("INACCEL_RUNTIME", "CORAL");

    let dst = dst.build();

    let xgb_root = xgb_root.canonicalize().unwrap();

    let bindings = bindgen::Builder::default()
        .header("wrapper.h")
        .clang_args(["-x", "c++", "-std=c++11"])
        .clang_arg(format!("-I{}", xgb_root.join("include").display()))
        .clang_arg(format!("-I{}", xgb_root.join("rabit/include").display()))
        .clang_arg(format!("-I{}", xgb_root.join("dmlc-core/include").display()))
        .allowlist_function("XG.*")
        .allowlist_function("Rabit.*")
        .allowlist_type("bst_ulong")
        .generate()
        .expect("Unable to generate bindings.");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("Couldn't write bindings.");

    println!("cargo:rustc-link-search={}", xgb_root.join("lib").display());
    println!("cargo:rustc-link-search={}", xgb_root.join("rabit/lib").display());
    println!("cargo:rustc-link-search={}", xgb_root.join("dmlc-core").display());

    // link to appropriate C++ lib
    if target.contains("apple") {
        println!("cargo:rustc-link-lib=c++");
        println!("cargo:rustc-link-lib=dylib=omp");
    } else {
        println!("cargo:rustc-link-lib=stdc++");
        println!("cargo:rustc-link-lib=dylib=gomp");
    }

    println!("cargo:rustc-link-search=native={}", dst.display());
    println!("cargo:rustc-link-search=native={}", dst.join("lib").display());
    println!("cargo:rustc-link-search=native={}", dst.join("lib64").display());
    println!("cargo:rustc-link-lib=static=dmlc");
    println!("cargo:rustc-link-lib=static=rabit");
    println!("cargo:rustc-link-lib=static=xgboost");

    #[cfg(feature = "fpga")]
    {
        if let Ok(xrt) = env::var("XILINX_XRT") {
            println!("cargo:rustc-link-search={}", Path::new(&xrt).join("lib").display());
        }
        println!("cargo:rustc-link-lib=dylib=OpenCL");
    }

    #[cfg(feature = "coral")]
    {
        if let Ok(coral) = env::var("CORAL_HOME") {
            println!("cargo:rustc-link-search={}", Path::new(&coral).join("lib").display());
        }
        println!("cargo:rustc-link-lib=dylib=coral-api");
    }
}
