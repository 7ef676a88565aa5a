use catvae::{common::*, config::Config, model::VaeInit, objective};

/// Categorical-latent variational autoencoder demo.
#[derive(FromArgs)]
struct Args {
    /// the config file.
    #[argh(option, default = "PathBuf::from(\"config.json5\")")]
    config: PathBuf,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args: Args = argh::from_env();
    let config = Config::open(&args.config)?;
    let model_config = &config.model;

    let vs = VarStore::new(model_config.device);
    let vae = VaeInit::from_config(model_config).build(&vs.root());
    info!(
        "model built: {} distributions x {} categories, input {}x{} padded to {}x{}",
        model_config.n_distributions,
        model_config.n_categories,
        model_config.image_height,
        model_config.image_width,
        vae.plan().padded_height,
        vae.plan().padded_width,
    );

    let image = Tensor::rand(
        &[1, 1, model_config.image_height, model_config.image_width],
        (Kind::Float, model_config.device),
    );
    let output = vae.forward_t(&image, false);
    let loss = objective::elbo(
        &output.reconstruction,
        &image,
        &output.distributions,
        model_config.n_categories,
    );

    info!("latent sample size: {:?}", output.sample.size());
    info!("reconstruction size: {:?}", output.reconstruction.size());
    info!("elbo loss on a random batch: {:.6}", loss.double_value(&[]));

    if let Some(path) = &config.output_file {
        save_reconstruction(&output.reconstruction, path)?;
        info!("saved reconstruction to {}", path.display());
    }

    Ok(())
}

fn save_reconstruction(reconstruction: &Tensor, path: &Path) -> Result<()> {
    let (_batch, _channels, height, width) = reconstruction.size4()?;
    let frame = (reconstruction.select(0, 0).select(0, 0) * 255.0)
        .to_kind(Kind::Uint8)
        .contiguous();

    let numel = (height * width) as usize;
    let mut pixels = vec![0u8; numel];
    frame.copy_data(&mut pixels, numel);

    let image = GrayImage::from_raw(width as u32, height as u32, pixels)
        .ok_or_else(|| anyhow!("reconstruction buffer does not match {}x{}", width, height))?;
    image.save(path)?;
    Ok(())
}
