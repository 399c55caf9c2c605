//! Builds a small synthetic reconstruction and walks the whole
//! geometry pipeline: cameras, frusta, gaze cones, cone selections,
//! and the two view transforms.
//!
//! Run with `RUST_LOG=debug` to see the load/build logging.

use gazescope_rs::{
    CameraBlock, CameraSet, Eye, GazeSamples, ImageSize, Mat3, PointCloud, Trackball, Vec2, Vec3,
};

fn block_from(rotation: Mat3, translation: Vec3, focal: f32) -> CameraBlock {
    let rows = rotation.transpose();
    CameraBlock([
        [focal, 0.0, 0.0],
        rows.x_axis.to_array(),
        rows.y_axis.to_array(),
        rows.z_axis.to_array(),
        translation.to_array(),
    ])
}

fn main() -> gazescope_rs::Result<()> {
    env_logger::init();

    // A loose shell of points around the origin.
    let mut positions = Vec::new();
    let mut colors = Vec::new();
    for i in 0u32..400 {
        let t = i as f32;
        let angle = t * 0.157;
        let height = (t * 0.013).sin();
        positions.push(Vec3::new(
            angle.cos() * (2.0 + height),
            height * 1.5,
            angle.sin() * (2.0 + height) - 4.0,
        ));
        colors.push([(i % 255) as u8, 128, 200]);
    }
    let cloud = PointCloud::new(positions, colors)?;
    let aabb = cloud.aabb().expect("cloud is not empty");
    println!(
        "cloud: {} points, bounds {:?} .. {:?}",
        cloud.len(),
        aabb.min,
        aabb.max
    );

    // Three keyframe cameras swinging around the cloud, plus one frame
    // the bundle adjuster rejected (it is skipped on load).
    let image = ImageSize {
        width: 640,
        height: 480,
    };
    let blocks = [
        block_from(Mat3::IDENTITY, Vec3::new(0.0, 0.0, 0.0), 520.0),
        block_from(Mat3::from_rotation_y(0.4), Vec3::new(0.5, 0.0, 0.2), 520.0),
        block_from(Mat3::from_rotation_y(-0.4), Vec3::new(-0.5, 0.0, 0.2), 520.0),
        CameraBlock([[0.0; 3]; 5]),
    ];
    let mut cameras = CameraSet::new();
    cameras.load_keyframes(&blocks, &[0, 30, 60, 90], &[image; 4])?;
    cameras.set_image_scale(0.002)?;
    println!("cameras: {} active of {} blocks", cameras.len(), blocks.len());

    // The subject fixated near the image center on two of the frames.
    let mut gaze = GazeSamples::new();
    gaze.insert(0, Vec2::new(0.0, 0.1));
    gaze.insert(30, Vec2::new(-0.2, 0.0));
    cameras.attach_gaze(&gaze);
    cameras.select_gaze_points(&cloud);

    for camera in cameras.iter() {
        let frame = camera.pose().frame();
        match (camera.cone(), camera.selection()) {
            (Some(cone), Some(selection)) => println!(
                "frame {frame}: {} points in the gaze cone, cone length {:.3}, radius {:.5}",
                selection.len(),
                cone.length(),
                cone.radius()
            ),
            _ => println!("frame {frame}: no gaze recorded"),
        }
        if let Some(frustum) = camera.frustum() {
            println!(
                "frame {frame}: frustum depth {:.4}, {} fan vertices",
                frustum.depth(),
                frustum.vertices([1.0, 0.0, 0.0, 1.0]).len()
            );
        }
    }

    // Look through the first camera, recentered like the browser does.
    let offset = cloud.centroid_offset().expect("cloud is not empty");
    let mut eye = Eye::new();
    let frustum = cameras
        .get(0)
        .and_then(|camera| camera.frustum())
        .expect("first camera has a frustum");
    eye.align_to(frustum, offset);
    println!("eye aperture {:.2} degrees", eye.aperture);

    // And spin the trackball a little.
    let viewport = Vec2::new(1280.0, 720.0);
    let mut trackball = Trackball::new();
    for step in 0..40 {
        let x = 500.0 + step as f32 * 4.0;
        trackball.drag(x, 360.0, 4.0, 1.5, viewport);
    }
    trackball.zoom_by(-60.0, viewport.y);
    let (theta, phi) = trackball.orientation();
    println!("trackball: theta {theta:.2}, phi {phi:.2}, zoom {:.2}", trackball.zoom());

    Ok(())
}
