
use crate::image::Image;
use crate::random::Random;
use crate::scene::camera::Camera;
use crate::scene::triangle::Triangle;
use crate::scene::{Scene, MAX_TRIANGLES};
use crate::spatial::math::vector::V3c;
use log::info;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

pub const MODEL_MAGIC: &str = "#MiniLight";

/// Error kinds raised while reading a model file.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unrecognised model format, expected a {MODEL_MAGIC} header")]
    UnrecognisedFormat,
    #[error("unexpected end of model file")]
    UnexpectedEnd,
    #[error("invalid number in model file: {0:?}")]
    InvalidNumber(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Token iterator over a model file. Whitespace separates tokens; `(` and `)`
/// are ordinary separator characters with no grouping meaning.
pub struct TokenStream<R: Read> {
    input: io::Bytes<BufReader<R>>,
}

impl<R: Read> TokenStream<R> {
    pub fn new(source: R) -> Self {
        Self {
            input: BufReader::new(source).bytes(),
        }
    }

    /// The next token, or none at end of input.
    pub fn next(&mut self) -> Result<Option<String>, ModelError> {
        let mut token = Vec::new();
        for byte in self.input.by_ref() {
            let byte = byte?;
            if byte.is_ascii_whitespace() || byte == b'(' || byte == b')' {
                if !token.is_empty() {
                    break;
                }
            } else {
                token.push(byte);
            }
        }
        Ok((!token.is_empty()).then(|| token.iter().map(|&byte| byte as char).collect()))
    }

    pub fn real(&mut self) -> Result<f64, ModelError> {
        let token = self.next()?.ok_or(ModelError::UnexpectedEnd)?;
        parse_real(&token)
    }

    pub fn integer(&mut self) -> Result<i64, ModelError> {
        let token = self.next()?.ok_or(ModelError::UnexpectedEnd)?;
        token
            .parse()
            .map_err(|_| ModelError::InvalidNumber(token))
    }

    pub fn vector(&mut self) -> Result<V3c<f64>, ModelError> {
        Ok(V3c::new(self.real()?, self.real()?, self.real()?))
    }
}

fn parse_real(token: &str) -> Result<f64, ModelError> {
    token
        .parse()
        .map_err(|_| ModelError::InvalidNumber(token.into()))
}

/// End of input anywhere inside a triangle record terminates the triangle
/// list; it is the expected way the list ends.
fn read_triangle<R: Read>(tokens: &mut TokenStream<R>) -> Result<Option<Triangle>, ModelError> {
    let mut fields = [V3c::unit(0.); 5];
    for field in fields.iter_mut() {
        *field = match tokens.vector() {
            Ok(vector) => vector,
            Err(ModelError::UnexpectedEnd) => return Ok(None),
            Err(error) => return Err(error),
        };
    }
    Ok(Some(Triangle::new(
        [fields[0], fields[1], fields[2]],
        fields[3],
        fields[4],
    )))
}

/// Everything a render needs, built once from a model file.
pub struct RenderJob {
    pub iterations: u32,
    pub image: Image,
    pub camera: Camera,
    pub scene: Scene,
}

/// Reads a complete model: magic header, iteration count, image size, camera,
/// background, then triangles until end of file.
pub fn parse<R: Read>(source: R) -> Result<RenderJob, ModelError> {
    let mut tokens = TokenStream::new(source);

    // the magic may arrive as one token or split into "#" and "MiniLight"
    let magic = tokens.next()?.ok_or(ModelError::UnexpectedEnd)?;
    let recognised = magic == MODEL_MAGIC
        || (magic == "#" && tokens.next()?.as_deref() == Some("MiniLight"));
    if !recognised {
        return Err(ModelError::UnrecognisedFormat);
    }

    let iterations = tokens.integer()?.clamp(0, u32::MAX as i64) as u32;

    let image = Image::new(tokens.integer()?, tokens.integer()?);

    let view_position = tokens.vector()?;
    let view_direction = tokens.vector()?;
    let view_angle = tokens.real()?;
    let camera = Camera::new(view_position, view_direction, view_angle);

    let sky_emission = tokens.vector()?;
    let ground_reflection = tokens.vector()?;

    let mut triangles = Vec::new();
    while triangles.len() < MAX_TRIANGLES {
        match read_triangle(&mut tokens)? {
            Some(triangle) => triangles.push(triangle),
            None => break,
        }
    }

    let scene = Scene::new(
        sky_emission,
        ground_reflection,
        triangles,
        camera.view_position(),
    );
    info!(
        "model loaded: {} triangles ({} emitters), {}x{} image, {} iterations",
        scene.triangles_count(),
        scene.emitters_count(),
        image.width(),
        image.height(),
        iterations
    );

    Ok(RenderJob {
        iterations,
        image,
        camera,
        scene,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Finished,
    Interrupted,
}

/// The image file sits next to the model file, with `.ppm` appended.
pub fn output_path(model_path: &Path) -> PathBuf {
    let mut name = model_path.as_os_str().to_os_string();
    name.push(".ppm");
    PathBuf::from(name)
}

/// Progressive refinement loop: renders frames until done or interrupted,
/// rewriting the image file whenever the frame number is a power of two and
/// at the final frame. An interrupt between frames discards nothing already
/// saved; the partially accumulated frame is simply dropped.
pub fn render(
    job: &mut RenderJob,
    random: &mut Random,
    interrupted: &AtomicBool,
    output_path: &Path,
) -> io::Result<RenderOutcome> {
    for frame in 1..=job.iterations {
        if interrupted.load(Ordering::SeqCst) {
            return Ok(RenderOutcome::Interrupted);
        }

        print!("\riteration: {frame}");
        io::stdout().flush()?;

        job.camera.frame(&job.scene, random, &mut job.image);

        if is_save_frame(frame, job.iterations) {
            save(&job.image, frame, output_path)?;
        }
    }
    Ok(RenderOutcome::Finished)
}

/// The image file is rewritten at every power-of-two frame and at the end.
pub(crate) fn is_save_frame(frame: u32, iterations: u32) -> bool {
    frame & frame.wrapping_sub(1) == 0 || frame == iterations
}

fn save(image: &Image, frame: u32, output_path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(output_path)?;
    let mut writer = io::BufWriter::new(file);
    image.write_ppm(&mut writer, frame)?;
    writer.flush()?;
    info!("saved {} at iteration {}", output_path.display(), frame);
    Ok(())
}
