use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::game::TableState;

/// Number of features in an observation vector
pub const OBS_DIM: usize = 8;

/// Velocity normalization constant (world units per second)
const VELOCITY_SCALE: f32 = 1000.0;

/// Create an 8-dimensional observation tensor from table state
///
/// Features, all normalized:
/// - 0: ball x / width
/// - 1: ball y / height
/// - 2: ball vx / 1000
/// - 3: ball vy / 1000
/// - 4: policy paddle x / width
/// - 5: policy paddle y / height
/// - 6: opponent paddle x / width
/// - 7: opponent paddle y / height
///
/// Returns: Tensor<B, 1> with shape [8]
pub fn create_observation<B: Backend>(state: &TableState, device: &B::Device) -> Tensor<B, 1> {
    let data = observation_features(state);
    Tensor::<B, 1>::from_data(TensorData::new(data.to_vec(), [OBS_DIM]), device)
}

/// Create a vertically mirrored observation
///
/// Used in play mode to run the trained policy from the other end of the
/// table: every y coordinate and the ball's vertical velocity are flipped in
/// place. The feature slots keep their roles, so the policy paddle stays in
/// slots 4-5 and still tracks the paddle the policy drives. The layout
/// matches [`create_observation`].
pub fn create_mirrored_observation<B: Backend>(
    state: &TableState,
    device: &B::Device,
) -> Tensor<B, 1> {
    let mut data = observation_features(state);
    data[1] = 1.0 - data[1];
    data[3] = -data[3];
    data[5] = 1.0 - data[5];
    data[7] = 1.0 - data[7];

    Tensor::<B, 1>::from_data(TensorData::new(data.to_vec(), [OBS_DIM]), device)
}

fn observation_features(state: &TableState) -> [f32; OBS_DIM] {
    let w = state.width;
    let h = state.height;
    [
        state.ball.position.x / w,
        state.ball.position.y / h,
        state.ball.velocity.x / VELOCITY_SCALE,
        state.ball.velocity.y / VELOCITY_SCALE,
        state.top_paddle.x / w,
        state.top_paddle.y / h,
        state.bottom_paddle.x / w,
        state.bottom_paddle.y / h,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BodyState, TableState, Vec2};
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;

    type TestBackend = NdArray<f32>;

    fn sample_state() -> TableState {
        TableState {
            ball: BodyState {
                position: Vec2::new(250.0, 350.0),
                velocity: Vec2::new(100.0, -500.0),
            },
            top_paddle: Vec2::new(250.0, 100.0),
            bottom_paddle: Vec2::new(125.0, 600.0),
            steps: 0,
            width: 500.0,
            height: 700.0,
        }
    }

    #[test]
    fn test_observation_shape() {
        let device = NdArrayDevice::default();
        let obs = create_observation::<TestBackend>(&sample_state(), &device);
        assert_eq!(obs.shape().dims, [8]);
    }

    #[test]
    fn test_observation_values() {
        let device = NdArrayDevice::default();
        let obs = create_observation::<TestBackend>(&sample_state(), &device);
        let data = obs.to_data();
        let values = data.as_slice::<f32>().unwrap();

        assert_eq!(values[0], 0.5); // ball x
        assert_eq!(values[1], 0.5); // ball y
        assert_eq!(values[2], 0.1); // ball vx
        assert_eq!(values[3], -0.5); // ball vy
        assert_eq!(values[4], 0.5); // own paddle x
        assert!((values[5] - 100.0 / 700.0).abs() < 1e-6);
        assert_eq!(values[6], 0.25); // opponent paddle x
        assert!((values[7] - 600.0 / 700.0).abs() < 1e-6);
    }

    #[test]
    fn test_positions_normalized_to_unit_range() {
        let device = NdArrayDevice::default();
        let obs = create_observation::<TestBackend>(&sample_state(), &device);
        let data = obs.to_data();
        let values = data.as_slice::<f32>().unwrap();

        for &i in &[0, 1, 4, 5, 6, 7] {
            assert!((0.0..=1.0).contains(&values[i]));
        }
    }

    #[test]
    fn test_mirrored_observation_flips_vertical_axis() {
        let device = NdArrayDevice::default();
        let obs = create_mirrored_observation::<TestBackend>(&sample_state(), &device);
        let data = obs.to_data();
        let values = data.as_slice::<f32>().unwrap();

        // Ball position and velocity flipped in y only
        assert_eq!(values[0], 0.5);
        assert_eq!(values[1], 0.5);
        assert_eq!(values[2], 0.1);
        assert_eq!(values[3], 0.5);
    }

    #[test]
    fn test_mirrored_observation_keeps_paddle_slots() {
        let device = NdArrayDevice::default();
        let obs = create_mirrored_observation::<TestBackend>(&sample_state(), &device);
        let data = obs.to_data();
        let values = data.as_slice::<f32>().unwrap();

        // Top paddle stays in slots 4-5, seen near y=600 after the flip
        assert_eq!(values[4], 0.5);
        assert!((values[5] - 600.0 / 700.0).abs() < 1e-6);
        // Bottom paddle stays in slots 6-7, seen near y=100
        assert_eq!(values[6], 0.25);
        assert!((values[7] - 100.0 / 700.0).abs() < 1e-6);
    }

    #[test]
    fn test_mirror_leaves_x_features_untouched() {
        let state = sample_state();
        let device = NdArrayDevice::default();
        let original = create_observation::<TestBackend>(&state, &device)
            .to_data()
            .as_slice::<f32>()
            .unwrap()
            .to_vec();
        let mirrored = create_mirrored_observation::<TestBackend>(&state, &device)
            .to_data()
            .as_slice::<f32>()
            .unwrap()
            .to_vec();

        for &i in &[0, 2, 4, 6] {
            assert_eq!(original[i], mirrored[i]);
        }
    }

    #[test]
    fn test_mirrored_policy_paddle_slots_track_policy_motion() {
        let device = NdArrayDevice::default();
        let mut state = sample_state();

        let before = create_mirrored_observation::<TestBackend>(&state, &device)
            .to_data()
            .as_slice::<f32>()
            .unwrap()
            .to_vec();

        // Only the policy-driven top paddle moves
        state.top_paddle = Vec2::new(300.0, 150.0);

        let after = create_mirrored_observation::<TestBackend>(&state, &device)
            .to_data()
            .as_slice::<f32>()
            .unwrap()
            .to_vec();

        // Its own-paddle slots respond, the opponent slots do not
        assert_ne!(before[4], after[4]);
        assert_ne!(before[5], after[5]);
        assert_eq!(before[6], after[6]);
        assert_eq!(before[7], after[7]);
    }
}
