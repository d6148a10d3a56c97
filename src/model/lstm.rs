//! LSTM sequence regressor network.
//!
//! A single Burn LSTM layer over `[batch, lahead, 1]` windows whose last
//! hidden output feeds a dense layer of width 1.

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Linear, LinearConfig, Lstm, LstmConfig, LstmState};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Configuration for [`LstmNet`].
#[derive(Config, Debug)]
pub struct LstmNetConfig {
    /// Timesteps per input window
    pub lahead: usize,
    /// Number of LSTM units
    pub hidden_size: usize,
}

impl LstmNetConfig {
    /// Initialize the network on `device`
    pub fn init<B: Backend>(&self, device: &B::Device) -> LstmNet<B> {
        let lstm = LstmConfig::new(1, self.hidden_size, true).init(device);
        let head = LinearConfig::new(self.hidden_size, 1)
            .with_bias(true)
            .init(device);

        LstmNet {
            lstm,
            head,
            lahead: self.lahead,
            hidden_size: self.hidden_size,
        }
    }
}

/// LSTM followed by a scalar dense head.
///
/// # Type Parameters
/// * `B` - The backend type
#[derive(Module, Debug)]
pub struct LstmNet<B: Backend> {
    /// Recurrent layer, one input feature per timestep
    lstm: Lstm<B>,
    /// Dense projection of the last hidden output
    head: Linear<B>,
    /// Window length the network is built for
    lahead: usize,
    /// Number of LSTM units
    hidden_size: usize,
}

impl<B: Backend> LstmNet<B> {
    /// Create a new network
    ///
    /// # Arguments
    /// * `lahead` - Timesteps per input window
    /// * `hidden_size` - Number of LSTM units
    /// * `device` - Device to create the module on
    pub fn new(lahead: usize, hidden_size: usize, device: &B::Device) -> Self {
        LstmNetConfig::new(lahead, hidden_size).init(device)
    }

    /// Get the window length
    pub fn lahead(&self) -> usize {
        self.lahead
    }

    /// Get the number of LSTM units
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// All-zero recurrent state for `batch_size` parallel series
    pub fn zero_state(&self, batch_size: usize, device: &B::Device) -> LstmState<B, 2> {
        LstmState::new(
            Tensor::zeros([batch_size, self.hidden_size], device),
            Tensor::zeros([batch_size, self.hidden_size], device),
        )
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `input` - Windows of shape `[batch, lahead, 1]`
    /// * `state` - Initial recurrent state of shape `[batch, hidden_size]`, zeros if `None`
    ///
    /// # Returns
    /// Tuple of (prediction `[batch, 1]`, final recurrent state)
    pub fn forward(
        &self,
        input: Tensor<B, 3>,
        state: Option<LstmState<B, 2>>,
    ) -> (Tensor<B, 2>, LstmState<B, 2>) {
        let [batch_size, seq_len, _] = input.dims();

        let (hidden_seq, state) = self.lstm.forward(input, state);

        // hidden_seq: [batch, seq, hidden] -> last timestep [batch, hidden]
        let last: Tensor<B, 2> = hidden_seq
            .slice([0..batch_size, seq_len - 1..seq_len, 0..self.hidden_size])
            .reshape([batch_size, self.hidden_size]);

        (self.head.forward(last), state)
    }
}

/// Cut a carried state out of the autodiff graph.
pub fn detach_state<B: Backend>(state: LstmState<B, 2>) -> LstmState<B, 2> {
    LstmState::new(state.cell.detach(), state.hidden.detach())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::backend::Backend as BurnBackend;

    type TestBackend = NdArray<f32>;
    type TestDevice = <TestBackend as BurnBackend>::Device;

    fn get_test_device() -> TestDevice {
        Default::default()
    }

    #[test]
    fn test_lstm_net_creation() {
        let device = get_test_device();
        let net = LstmNet::<TestBackend>::new(3, 20, &device);

        assert_eq!(net.lahead(), 3);
        assert_eq!(net.hidden_size(), 20);
    }

    #[test]
    fn test_lstm_net_from_config() {
        let device = get_test_device();
        let config = LstmNetConfig::new(4, 12);
        let net: LstmNet<TestBackend> = config.init(&device);

        assert_eq!(net.lahead(), 4);
        assert_eq!(net.hidden_size(), 12);

        let input = Tensor::<TestBackend, 3>::zeros([2, 4, 1], &device);
        let (output, state) = net.forward(input, None);
        assert_eq!(output.dims(), [2, 1]);
        assert_eq!(state.hidden.dims(), [2, 12]);
    }

    #[test]
    fn test_lstm_net_forward_shapes() {
        let device = get_test_device();
        let net = LstmNet::<TestBackend>::new(5, 8, &device);

        let input = Tensor::<TestBackend, 3>::zeros([4, 5, 1], &device);
        let (output, state) = net.forward(input, None);

        assert_eq!(output.dims(), [4, 1]);
        assert_eq!(state.hidden.dims(), [4, 8]);
        assert_eq!(state.cell.dims(), [4, 8]);
    }

    #[test]
    fn test_zero_state_matches_none() {
        let device = get_test_device();
        let net = LstmNet::<TestBackend>::new(2, 6, &device);

        let input = Tensor::<TestBackend, 3>::random(
            [2, 2, 1],
            burn::tensor::Distribution::Uniform(-1.0, 1.0),
            &device,
        );

        let (a, _) = net.forward(input.clone(), None);
        let (b, _) = net.forward(input, Some(net.zero_state(2, &device)));

        let diff: f32 = (a - b).abs().sum().into_scalar();
        assert!(diff < 1e-6, "explicit zero state should equal default state");
    }

    #[test]
    fn test_state_changes_output() {
        let device = get_test_device();
        let net = LstmNet::<TestBackend>::new(1, 6, &device);

        let input = Tensor::<TestBackend, 3>::ones([1, 1, 1], &device);
        let (first, state) = net.forward(input.clone(), None);
        let (second, _) = net.forward(input, Some(state));

        let diff: f32 = (first - second).abs().sum().into_scalar();
        assert!(diff > 0.0, "carried state should affect the next prediction");
    }
}
