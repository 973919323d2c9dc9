// ROIの切り出し
// 各軸を独立に [0, dim-1] へクランプする（端画素の複製）。

use crate::core::{CorePoint, Roi, ROI_HALF_SIZE, ROI_SIZE};
use crate::imaging::filters::clamp_index;
use image::GrayImage;

/// コアポイントを中心に 101x101 のROIを切り出す
pub fn extract_roi_around_point(
    image: &GrayImage,
    core_point: &CorePoint,
    filename: &str,
    file_index: i32,
) -> Option<Roi> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if w == 0 || h == 0 {
        return None;
    }

    let center_x = core_point.x as i64;
    let center_y = core_point.y as i64;
    let raw = image.as_raw();

    let mut pixels = Vec::with_capacity(ROI_SIZE * ROI_SIZE);
    for dy in 0..ROI_SIZE as i64 {
        let sy = clamp_index(center_y - ROI_HALF_SIZE + dy, h);
        for dx in 0..ROI_SIZE as i64 {
            let sx = clamp_index(center_x - ROI_HALF_SIZE + dx, w);
            pixels.push(raw[sy * w + sx]);
        }
    }

    Roi::from_pixels(pixels, filename, file_index)
}
