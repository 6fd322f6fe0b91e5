use ipdetect::image::tiles::Rect;
use ipdetect::{crop_points, ImageView, InterestPoint, IpDetectError, OwnedImage};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0.0f32; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        IpDetectError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0.0f32; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        IpDetectError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0.0f32; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, IpDetectError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn roi_keeps_parent_stride() {
    let data: Vec<f32> = (0..20).map(|v| v as f32).collect();
    let view = ImageView::from_slice(&data, 5, 4).unwrap();
    let roi = view.roi(1, 2, 3, 2).unwrap();
    assert_eq!(roi.stride(), 5);
    assert_eq!(roi.row(1).unwrap(), &[16.0f32, 17.0, 18.0]);

    let err = view.roi(3, 0, 3, 1).err().unwrap();
    assert_eq!(
        err,
        IpDetectError::RoiOutOfBounds {
            x: 3,
            y: 0,
            width: 3,
            height: 1,
            img_width: 5,
            img_height: 4,
        }
    );
}

#[test]
fn point_coordinates_by_index() {
    let mut p = InterestPoint::new(3, 4, 1.0, 0.5);
    p.x = 3.25;
    assert_eq!(p.size(), 2);
    assert_eq!(p[0], 3.25);
    assert_eq!(p[1], 4.0);
    assert_eq!(p.coord(1), Ok(4.0));
    assert_eq!(
        p.coord(2),
        Err(IpDetectError::IndexOutOfBounds {
            index: 2,
            len: 2,
            context: "interest point coordinate",
        })
    );
    assert!(p.descriptor.is_empty());
    assert!(p.orientation.is_none());
}

#[test]
#[should_panic(expected = "invalid coordinate index")]
fn point_index_out_of_range_panics() {
    let p = InterestPoint::new(0, 0, 1.0, 0.0);
    let _ = p[2];
}

#[test]
fn crop_keeps_points_inside_box() {
    let points = vec![
        InterestPoint::new(1, 1, 1.0, 0.1),
        InterestPoint::new(5, 5, 1.0, 0.2),
        InterestPoint::new(9, 2, 1.0, 0.3),
    ];
    let kept = crop_points(&points, Rect::new(0, 0, 6, 6));
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[1].ix, 5);
}

#[test]
fn owned_image_zip_map_requires_matching_sizes() {
    let a = OwnedImage::filled(2, 2, 1.0f32).unwrap();
    let b = OwnedImage::filled(3, 2, 2.0f32).unwrap();
    assert!(a.zip_map(&b, |x, y| x + y).is_err());
    let c = a.zip_map(&a, |x, y| x + y).unwrap();
    assert_eq!(c.data(), &[2.0f32; 4]);
}
