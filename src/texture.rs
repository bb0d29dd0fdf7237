use std::path::Path;

/// Represents a 2D texture for texture mapping.
///
/// Pixels are stored row-major as packed ARGB words. Sampling is
/// nearest-neighbor with wrap-repeat addressing; any V flip required by
/// the asset's origin convention is the rasterizer's job, not the
/// sampler's.
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a two-color checkerboard, used as the fallback texture when
    /// no image file is supplied.
    pub fn checkerboard(size: u32, cell: u32, light: u32, dark: u32) -> Self {
        let data = (0..size * size)
            .map(|i| {
                let x = i % size;
                let y = i / size;
                if ((x / cell) + (y / cell)) % 2 == 0 {
                    light
                } else {
                    dark
                }
            })
            .collect();

        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor
    /// filtering with wrap-repeat addressing.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let x = ((u * self.width as f32).floor().abs() as u32) % self.width;
        let y = ((v * self.height as f32).floor().abs() as u32) % self.height;
        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
