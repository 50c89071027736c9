use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use heatgrid_kernel::World;

use crate::renderer::Renderer;

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
/// 72 dpi expressed in pixels per metre.
const PIXELS_PER_METRE: u32 = 0x0B13;

/// Errors from bitmap export.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("a {width}x{height} world is too large for a bitmap")]
    TooLarge { width: u32, height: u32 },
}

/// Uncompressed 24-bit BMP export, one pixel per cell.
///
/// Rows are emitted in world order (`y = 0` first), which BMP stores
/// bottom-up. Insulators are pure green; every other cell blends from blue
/// (cold) to red (hot). Each row is zero-padded to a 4-byte boundary.
#[derive(Debug, Default)]
pub struct BitmapRenderer;

impl BitmapRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for BitmapRenderer {
    type Output = Result<Vec<u8>, RenderError>;

    fn render(&self, world: &World) -> Self::Output {
        let mut buf = Vec::new();
        write_bitmap(world, &mut buf)?;
        Ok(buf)
    }
}

/// Byte sizes of a bitmap for a given world shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BitmapLayout {
    row_len: usize,
    data_len: u32,
    total_len: u32,
}

impl BitmapLayout {
    /// Sizes for a `width x height` image, or `TooLarge` when any header
    /// field would overflow.
    fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let too_large = || RenderError::TooLarge { width, height };
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(too_large());
        }

        let pad = (4 - (width as u64 * 3) % 4) % 4;
        let row_len = width as u64 * 3 + pad;
        let data_len = u32::try_from(row_len * height as u64).map_err(|_| too_large())?;
        let total_len = data_len
            .checked_add(FILE_HEADER_LEN + INFO_HEADER_LEN)
            .ok_or_else(too_large)?;
        Ok(Self {
            row_len: usize::try_from(row_len).map_err(|_| too_large())?,
            data_len,
            total_len,
        })
    }
}

/// Write `world` as a BMP image to `dst`.
pub fn write_bitmap<W: Write>(world: &World, dst: W) -> Result<(), RenderError> {
    let layout = BitmapLayout::new(world.width(), world.height())?;
    write_with_layout(world, layout, dst)
}

fn write_with_layout<W: Write>(
    world: &World,
    layout: BitmapLayout,
    mut dst: W,
) -> Result<(), RenderError> {
    let (w, h) = (world.width(), world.height());

    let mut header = Vec::with_capacity((FILE_HEADER_LEN + INFO_HEADER_LEN) as usize);
    header.extend_from_slice(b"BM");
    header.extend_from_slice(&layout.total_len.to_le_bytes());
    header.extend_from_slice(&[0; 4]);
    header.extend_from_slice(&(FILE_HEADER_LEN + INFO_HEADER_LEN).to_le_bytes());

    header.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    header.extend_from_slice(&w.to_le_bytes());
    header.extend_from_slice(&h.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // planes
    header.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
    header.extend_from_slice(&0u32.to_le_bytes()); // no compression
    header.extend_from_slice(&layout.data_len.to_le_bytes());
    header.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    header.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    header.extend_from_slice(&0u32.to_le_bytes()); // palette colours
    header.extend_from_slice(&0u32.to_le_bytes()); // important colours
    dst.write_all(&header)?;

    let width = w as usize;
    let mut scanline = vec![0u8; layout.row_len];
    for (flags, temps) in world
        .properties()
        .chunks(width)
        .zip(world.state().chunks(width))
    {
        for ((px, f), t) in scanline.chunks_exact_mut(3).zip(flags).zip(temps) {
            px.copy_from_slice(&cell_bgr(f.is_insulator(), *t));
        }
        dst.write_all(&scanline)?;
    }
    dst.flush()?;

    tracing::debug!(width = w, height = h, bytes = layout.total_len, "wrote bitmap");
    Ok(())
}

/// Render `world` to `path`, or to stdout when `path` is `-`.
///
/// File output goes to a sibling `<name>.tmp` that is renamed over `path`
/// only after a complete write, so a failed render leaves any existing file
/// at `path` untouched.
pub fn render_to_path(world: &World, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let layout = BitmapLayout::new(world.width(), world.height())?;
    if path == Path::new("-") {
        let stdout = std::io::stdout();
        return write_with_layout(world, layout, BufWriter::new(stdout.lock()));
    }

    let tmp = tmp_path(path);
    let result = File::create(&tmp).map_err(RenderError::from).and_then(|file| {
        let mut out = BufWriter::new(file);
        write_with_layout(world, layout, &mut out)?;
        out.into_inner()
            .map_err(|e| RenderError::Io(e.into_error()))?
            .sync_all()?;
        Ok(())
    });
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn cell_bgr(insulator: bool, temperature: f32) -> [u8; 3] {
    if insulator {
        [0, 255, 0]
    } else {
        let heat = (temperature * 255.0) as u8;
        [255 - heat, 0, heat]
    }
}
