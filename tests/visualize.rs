use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use circle_nn::{
    train_loop, Activation, CircleDataset, Error, NetworkConfig, TrainConfig, TwoLayerNetwork,
    VisualConfig, Visualizer,
};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Delay};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("circle-nn-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn small_config(dir: PathBuf) -> VisualConfig {
    VisualConfig {
        result_dir: dir,
        panel_size: 48,
        grid_resolution: 10,
        ..VisualConfig::default()
    }
}

fn setup(hidden: usize) -> (TwoLayerNetwork, CircleDataset) {
    let mut rng = StdRng::seed_from_u64(0);
    let data = CircleDataset::generate(40, &mut rng).unwrap();
    let config = NetworkConfig::new(2, hidden, 1, 0.1, Activation::Tanh);
    (TwoLayerNetwork::new(config, &mut rng).unwrap(), data)
}

#[test]
fn writes_one_gif_frame_per_observation() {
    let dir = scratch_dir("frames");
    let (mut network, data) = setup(3);
    let mut visualizer = Visualizer::new(small_config(dir.clone())).unwrap();

    train_loop(&mut network, &data, &TrainConfig::new(30, 10), &mut visualizer).unwrap();
    assert_eq!(visualizer.frames().len(), 3);
    assert_eq!(visualizer.frames()[0].dimensions(), (144, 48));

    let path = visualizer.finish().unwrap();
    assert_eq!(path, dir.join("visualize.gif"));

    let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.delay(), Delay::from_numer_denom_ms(100, 1));
    }

    // NETSCAPE2.0 application block with a loop count of 0 (repeat forever)
    let bytes = std::fs::read(&path).unwrap();
    let looping = b"NETSCAPE2.0\x03\x01\x00\x00";
    assert!(bytes.windows(looping.len()).any(|w| w == looping));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn hidden_layer_smaller_than_three_aborts_training() {
    let dir = scratch_dir("narrow");
    let (mut network, data) = setup(2);
    let mut visualizer = Visualizer::new(small_config(dir)).unwrap();

    let res = train_loop(&mut network, &data, &TrainConfig::new(10, 10), &mut visualizer);
    assert!(matches!(res, Err(Error::Configuration(_))));
}

#[test]
fn finishing_without_frames_fails() {
    let visualizer = Visualizer::new(small_config(scratch_dir("empty"))).unwrap();
    assert!(matches!(visualizer.finish(), Err(Error::Configuration(_))));
}

#[test]
fn invalid_visual_config_is_rejected() {
    let config = VisualConfig { grid_resolution: 1, ..VisualConfig::default() };
    assert!(Visualizer::new(config).is_err());
}
