//! Placement of rasters on output pages

/// Where a raster lands on a page, in page units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Uniform factor applied to the raster
    pub scale: f64,
}

/// Scale a `raster` uniformly to fit inside `target` and center it.
/// Both are (width, height); the result is in target units.
pub fn fit_placement(raster: (u32, u32), target: (f64, f64)) -> Placement {
    let (rw, rh) = (raster.0.max(1) as f64, raster.1.max(1) as f64);
    let (tw, th) = target;
    let scale = (tw / rw).min(th / rh);
    let width = rw * scale;
    let height = rh * scale;
    Placement {
        x: (tw - width) / 2.0,
        y: (th - height) / 2.0,
        width,
        height,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tall_raster_on_a4() {
        let p = fit_placement((1000, 1400), (794.0, 1123.0));

        assert!((p.scale - 0.794).abs() < 1e-9);
        assert!((p.width - 794.0).abs() < 1e-9);
        assert!((p.height - 1111.6).abs() < 1e-9);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 5.7).abs() < 1e-9);

        let bottom = 1123.0 - (p.y + p.height);
        assert!((bottom - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_wide_raster_is_letterboxed() {
        let p = fit_placement((2000, 500), (800.0, 1000.0));
        assert_eq!(p.scale, 0.4);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 400.0);
    }

    proptest! {
        #[test]
        fn placement_fits_and_is_centered(
            rw in 1u32..5000, rh in 1u32..5000,
            tw in 10.0f64..3000.0, th in 10.0f64..3000.0,
        ) {
            let p = fit_placement((rw, rh), (tw, th));
            prop_assert!(p.width <= tw + 1e-6);
            prop_assert!(p.height <= th + 1e-6);
            prop_assert!((p.x - (tw - p.x - p.width)).abs() < 1e-6);
            prop_assert!((p.y - (th - p.y - p.height)).abs() < 1e-6);
            // One dimension is filled exactly.
            prop_assert!((p.width - tw).abs() < 1e-6 || (p.height - th).abs() < 1e-6);
        }
    }
}
