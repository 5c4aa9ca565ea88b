use std::sync::Once;

/// Logger setup for applications embedding the renderer.
///
/// `env_filter` uses the `env_logger` directive syntax
/// (e.g. `"gooey_render=debug"`). When it is `None`, `RUST_LOG` is consulted,
/// then the level falls back to `Info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Ceiling applied to the graphics stack's own crates (`wgpu_core`,
    /// `wgpu_hal`, `naga`), which are very chatty at `info`.
    pub gpu_stack_level: log::LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            gpu_stack_level: log::LevelFilter::Warn,
        }
    }
}

static INIT: Once = Once::new();

const GPU_STACK: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Installs the global `env_logger` once; later calls do nothing.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(log::LevelFilter::Info);
        for module in GPU_STACK {
            builder.filter_module(module, config.gpu_stack_level);
        }

        // Explicit directives win over the defaults above.
        if let Some(filter) = config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            builder.parse_filters(&filter);
        }

        builder.write_style(config.write_style);
        if builder.try_init().is_err() {
            log::warn!("init_logging: a global logger was already installed");
            return;
        }

        log::debug!("logging initialized");
    });
}
