use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // 主机单元测试不需要链接脚本
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if target_arch != "xtensa" {
        return;
    }

    // esp-hal 1.0 的统一链接脚本
    println!("cargo:rustc-link-arg=-Tlinkall.x");

    // defmt 需要自己的段定义
    if env::var_os("CARGO_FEATURE_LOG_DEFMT").is_some() {
        println!("cargo:rustc-link-arg=-Tdefmt.x");
    }
}
