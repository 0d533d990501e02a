use candle_core::Device;
use tracing::debug;

/// Picks the compute device for inference.
///
/// GPU backends are only tried when compiled in (`cuda` / `metal` features); any failure
/// falls through to the next candidate and finally to the CPU.
pub fn select_device() -> Device {
    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            tracing::info!("Using CUDA GPU acceleration");
            return device;
        }
        Err(e) => tracing::warn!(error = %e, "CUDA device unavailable"),
    }

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            tracing::info!("Using Metal GPU acceleration");
            return device;
        }
        Err(e) => tracing::warn!(error = %e, "Metal device unavailable"),
    }

    debug!("Running embedding inference on CPU");
    Device::Cpu
}

/// Short name of a device for logs and readiness reports.
pub fn device_label(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}
