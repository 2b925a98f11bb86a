use batch_squeeze::{compressed_name, plan};

fn main() {
    for (width, height) in [(1000, 500), (3000, 1500), (1500, 3000), (2500, 2500), (4000, 20)] {
        let target = plan(width, height);
        println!(
            "{}x{} -> {:.2}x{:.2} (pixels {:?}, resized: {})",
            width,
            height,
            target.width,
            target.height,
            target.pixel_size(),
            target.is_downscale_of(width, height)
        );
    }

    for name in ["photo.png", "archive.tar.gz", "README"] {
        println!("{} -> {}", name, compressed_name(name));
    }
}
