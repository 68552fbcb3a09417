use cfg_feature_groups;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.lock");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rustc-check-cfg=cfg(log, values(\"log_dummy\", \"log_itm\"))");
    println!("cargo:rustc-check-cfg=cfg(level, values(\"level_debug\", \"level_info\", \"level_error\"))");

    cfg_feature_groups::setup_feature_groups();
}
