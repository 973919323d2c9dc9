// グレースケール画像の基本フィルタ
// ガウシアンぼかし・レンジ正規化・ヒストグラム平坦化・ラプラシアン
//
// 境界は全て端画素の複製（クランプ）で扱う。

use image::GrayImage;

/// ガウシアンカーネル（1次元、総和1に正規化済み）を作成
///
/// `sigma <= 0` の場合はカーネルサイズから標準的な値を導出する。
pub fn gaussian_kernel(ksize: usize, sigma: f32) -> Vec<f32> {
    let ksize = ksize.max(1);
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let center = (ksize / 2) as f32;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..ksize)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// 分離型ガウシアンぼかし
pub fn gaussian_blur(image: &GrayImage, ksize: usize, sigma: f32) -> GrayImage {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if w == 0 || h == 0 {
        return image.clone();
    }
    let kernel = gaussian_kernel(ksize, sigma);
    let radius = kernel.len() / 2;
    let src = image.as_raw();

    // 水平方向
    let mut tmp = vec![0f32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = clamp_index(x as i64 + k as i64 - radius as i64, w);
                acc += weight * row[sx] as f32;
            }
            tmp[y * w + x] = acc;
        }
    }

    // 垂直方向
    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = clamp_index(y as i64 + k as i64 - radius as i64, h);
                acc += weight * tmp[sy * w + x];
            }
            out[y * w + x] = saturate_u8(acc);
        }
    }

    GrayImage::from_raw(w as u32, h as u32, out).unwrap_or_else(|| image.clone())
}

/// 最小値・最大値を [0, 255] に引き伸ばす
///
/// 全画素が同値の場合は全て0になる。
pub fn normalize_min_max(image: &GrayImage) -> GrayImage {
    let raw = image.as_raw();
    let (Some(&min), Some(&max)) = (raw.iter().min(), raw.iter().max()) else {
        return image.clone();
    };

    let mut out = image.clone();
    if max == min {
        out.as_mut().fill(0);
        return out;
    }

    let scale = 255.0f32 / (max - min) as f32;
    for p in out.as_mut().iter_mut() {
        *p = saturate_u8((*p - min) as f32 * scale);
    }
    out
}

/// ヒストグラム平坦化
///
/// 画素値が1種類しかない画像はそのまま返す。
pub fn equalize_histogram(image: &GrayImage) -> GrayImage {
    let raw = image.as_raw();
    let total = raw.len();
    if total == 0 {
        return image.clone();
    }

    let mut hist = [0usize; 256];
    for &p in raw {
        hist[p as usize] += 1;
    }

    let first = hist.iter().position(|&count| count > 0).unwrap_or(0);
    if hist[first] == total {
        return image.clone();
    }

    let scale = 255.0f32 / (total - hist[first]) as f32;
    let mut lut = [0u8; 256];
    let mut sum = 0usize;
    for level in (first + 1)..256 {
        sum += hist[level];
        lut[level] = saturate_u8(sum as f32 * scale);
    }

    let mut out = image.clone();
    for p in out.as_mut().iter_mut() {
        *p = lut[*p as usize];
    }
    out
}

/// 4近傍ラプラシアン応答
pub fn laplacian(image: &GrayImage) -> Vec<f64> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let src = image.as_raw();
    let at = |x: i64, y: i64| -> f64 { src[clamp_index(y, h) * w + clamp_index(x, w)] as f64 };

    let mut out = Vec::with_capacity(w * h);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            out.push(at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1) - 4.0 * at(x, y));
        }
    }
    out
}

/// インデックスを [0, len-1] にクランプ
#[inline]
pub fn clamp_index(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

#[inline]
fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
