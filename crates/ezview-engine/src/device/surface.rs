use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the swapchain format: a common 8-bit sRGB format when preferred and
/// offered, otherwise the first format the surface reports.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *caps.formats.first()?;

    if prefer_srgb {
        let srgb = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ]
        .into_iter()
        .find(|f| caps.formats.contains(f))
        .or_else(|| caps.formats.iter().copied().find(|f| f.is_srgb()));

        if let Some(f) = srgb {
            return Some(f);
        }
        log::warn!("no sRGB surface format available; colors may look washed out");
    }

    Some(first)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Records the new size and reconfigures the surface.
///
/// wgpu rejects a 0x0 surface (minimized window); configuration is deferred
/// until a non-zero size arrives.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
}

/// Policy for each surface error, independent of the surface itself.
pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = classify_surface_error(&err);
    match action {
        SurfaceErrorAction::Reconfigured => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            log::debug!("surface {err:?}; reconfigured");
        }
        SurfaceErrorAction::Fatal => log::error!("surface {err:?}"),
        SurfaceErrorAction::SkipFrame => log::debug!("surface {err:?}; skipping frame"),
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::SurfaceError;

    #[test]
    fn out_of_memory_is_fatal() {
        assert_eq!(classify_surface_error(&SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }

    #[test]
    fn lost_and_outdated_reconfigure() {
        assert_eq!(classify_surface_error(&SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(
            classify_surface_error(&SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
    }

    #[test]
    fn timeout_and_other_skip_the_frame() {
        assert_eq!(classify_surface_error(&SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(classify_surface_error(&SurfaceError::Other), SurfaceErrorAction::SkipFrame);
    }
}
