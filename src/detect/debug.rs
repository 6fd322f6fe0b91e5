//! Debug image dumps of the derived fields.
//!
//! Each field is stretched to `[0, 255]` and written as a JPEG. These are
//! side effects only; nothing reads the files back.

use crate::image::io::write_normalized;
use crate::interest::InterestData;
use crate::util::IpResult;
use std::path::Path;

/// Writes `grad_x.jpg`, `grad_y.jpg`, `ori.jpg`, `mag.jpg` and, once the
/// operator has run, `interest.jpg` into `dir`.
pub fn write_interest_images<P: AsRef<Path>>(dir: P, data: &InterestData) -> IpResult<()> {
    let dir = dir.as_ref();
    write_normalized(dir.join("grad_x.jpg"), data.gradient_x())?;
    write_normalized(dir.join("grad_y.jpg"), data.gradient_y())?;
    write_normalized(dir.join("ori.jpg"), data.orientation())?;
    write_normalized(dir.join("mag.jpg"), data.magnitude())?;
    if let Some(interest) = data.interest() {
        write_normalized(dir.join("interest.jpg"), interest)?;
    }
    Ok(())
}

/// Writes the per-plane fields of one octave as `scale_00.jpg`,
/// `grad_x_00.jpg`, `grad_y_00.jpg`, `ori_00.jpg`, `mag_00.jpg` and
/// `interest_00.jpg`, numbered by plane.
pub fn write_octave_images<P: AsRef<Path>>(dir: P, planes: &[InterestData]) -> IpResult<()> {
    let dir = dir.as_ref();
    for (k, data) in planes.iter().enumerate() {
        write_normalized(dir.join(format!("scale_{k:02}.jpg")), data.source())?;
        write_normalized(dir.join(format!("grad_x_{k:02}.jpg")), data.gradient_x())?;
        write_normalized(dir.join(format!("grad_y_{k:02}.jpg")), data.gradient_y())?;
        write_normalized(dir.join(format!("ori_{k:02}.jpg")), data.orientation())?;
        write_normalized(dir.join(format!("mag_{k:02}.jpg")), data.magnitude())?;
        if let Some(interest) = data.interest() {
            write_normalized(dir.join(format!("interest_{k:02}.jpg")), interest)?;
        }
    }
    Ok(())
}
