use crate::data::dataset::Batch;
use crate::error::Result;
use crate::network::backprop::backpropagate;
use crate::network::network::Network;

/// One gradient descent step on `batch`: forward pass, backpropagation, weight update.
///
/// Every stage reads the same weights; they are replaced only once the whole
/// update has been computed.
pub fn train_step(network: &mut Network, batch: &Batch) -> Result<()> {
    let pass = network.forward(batch.inputs())?;
    let errors = backpropagate(&pass, network.weights(), batch.targets())?;
    let updated = network
        .optimizer()
        .step(network.weights(), &pass.activations, &errors)?;
    network.replace_weights(updated);
    Ok(())
}
