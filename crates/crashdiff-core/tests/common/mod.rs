use crashdiff_core::config::{CompiledConfig, DiffConfig};
use serde_json::{json, Value};

/// The shipped stack-walker preset
#[allow(dead_code)]
pub const STACKWALK_PRESET: &str = include_str!("../../../../presets/stackwalk.yaml");

/// Compile the shipped preset
#[allow(dead_code)]
pub fn stackwalk_config() -> CompiledConfig {
    DiffConfig::from_yaml_str(STACKWALK_PRESET)
        .unwrap()
        .compile()
        .unwrap()
}

/// Compile a YAML configuration fragment
#[allow(dead_code)]
pub fn config_from_yaml(yaml: &str) -> CompiledConfig {
    DiffConfig::from_yaml_str(yaml).unwrap().compile().unwrap()
}

/// A resolved stack frame
#[allow(dead_code)]
pub fn frame(function: &str, offset: &str) -> Value {
    json!({
        "function": function,
        "module": "xul.dll",
        "offset": offset,
        "trust": "cfi",
    })
}

/// A thread whose frames call the named functions, innermost first
#[allow(dead_code)]
pub fn thread(functions: &[&str]) -> Value {
    let frames: Vec<Value> = functions
        .iter()
        .enumerate()
        .map(|(i, f)| frame(f, &format!("0x{:08x}", 0x1000 + i * 0x10)))
        .collect();
    json!({ "frame_count": frames.len(), "frames": frames })
}

/// A minimal stack-walker document
#[allow(dead_code)]
pub fn crash(threads: Vec<Value>) -> Value {
    json!({
        "status": "OK",
        "crash_info": { "type": "EXCEPTION_ACCESS_VIOLATION_READ", "crashing_thread": 0 },
        "system_info": { "os": "Windows NT", "cpu_arch": "amd64" },
        "threads": threads,
        "modules": [
            { "filename": "xul.dll", "code_id": "5F3B", "version": "80.0" },
            { "filename": "ntdll.dll", "code_id": "A1B2", "version": "10.0" }
        ],
    })
}
