use lazy_static::lazy_static;
use mut_static::MutStatic;
use crate::tool::Tool;

lazy_static! {
    pub static ref CONFIG_DEF: Tool = Tool {
        mode: String::from("generate"),
        key: String::from("key"),
        key_type: String::from("elliptic"),
        input: String::from("stdin"),
        output: String::from("stdout"),
        signature: String::from("key.sig"),
        count: 1,
        threads: num_cpus::get(),
        silent: false,
    };
    pub static ref SILENT: MutStatic<bool> =
        MutStatic::new();
}

/// Unset counts as not silent.
pub fn silent() -> bool {
    SILENT.read().map(|s| *s).unwrap_or(false)
}

/// Set once per process; later calls keep the first value.
pub fn init_silent(value: bool) {
    if let Ok(false) = SILENT.is_set() {
        SILENT.set(value).ok();
    }
}
