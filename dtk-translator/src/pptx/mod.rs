//! PowerPoint (`.pptx`) format handler.
//!
//! Slides are processed in deck order. Sequential mode extracts, translates
//! and replaces one slide at a time; parallel mode extracts every target
//! slide first, translates slide text lists through a bounded pool, and
//! replaces each slide as its translations arrive. Both paths share the
//! same walker, so the EXTRACT and REPLACE traversals are identical by
//! construction.

pub mod package;
pub mod walker;
pub mod xml;

use crate::handler::{FileTranslator, TranslateContext};
use crate::pptx::package::{PptxPackage, SlideParts};
use crate::pptx::walker::{TextSink, WalkOptions, walk_slide};
use crate::text::TextTranslator;
use async_stream::stream;
use dtk_core::{Result, TaskStream};
use futures::StreamExt;
use futures::stream as futures_stream;
use tracing::{info, warn};

/// Bound on concurrently translated slides in parallel mode.
const PARALLEL_TRANSLATIONS: usize = 8;

pub struct PptxTranslator;

impl PptxTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PptxTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTranslator for PptxTranslator {
    fn translate_impl(&self, ctx: TranslateContext) -> TaskStream {
        Box::pin(stream! {
            let TranslateContext { task, input_path, output_dir, translator, options } = ctx;
            let mut task = task;
            info!(input = %input_path.display(), parallel = options.run_parallely, "translating presentation");

            let mut package = match PptxPackage::open(&input_path) {
                Ok(package) => package,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let slide_names = match package.slide_part_names() {
                Ok(names) => names,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            // out-of-range target indices are ignored; the remaining count is
            // the progress denominator
            let targets: Vec<usize> = match &options.target_pages {
                Some(pages) => {
                    pages.iter().copied().filter(|&index| index < slide_names.len()).collect()
                }
                None => (0..slide_names.len()).collect(),
            };
            let total = targets.len();

            let walk_opts = WalkOptions {
                translate_pictures: options.translate_pictures,
                target_font: translator.target_language().default_font().to_string(),
            };

            if options.run_parallely {
                // EXTRACT pass over every target slide
                let mut slides: Vec<Option<SlideParts>> = Vec::with_capacity(total);
                let mut extracted: Vec<Vec<String>> = Vec::with_capacity(total);
                for &index in &targets {
                    match load_and_extract(&package, &slide_names[index], &walk_opts) {
                        Ok((parts, texts)) => {
                            slides.push(Some(parts));
                            extracted.push(texts);
                        }
                        Err(e) => {
                            warn!(slide = index, error = %e, "slide extraction failed");
                            task.error = Some(format!("slide {}: {}", index, e));
                            slides.push(None);
                            extracted.push(Vec::new());
                        }
                    }
                }

                // translate each slide's text list through the bounded pool
                let mut translations = futures_stream::iter(extracted.into_iter().enumerate())
                    .map(|(position, texts)| {
                        let translator = translator.clone();
                        async move {
                            let mut translated = Vec::with_capacity(texts.len());
                            for text in texts {
                                match translator.translate(&text).await {
                                    Ok(t) => translated.push(t),
                                    Err(e) => return (position, Err(e)),
                                }
                            }
                            (position, Ok(translated))
                        }
                    })
                    .buffer_unordered(PARALLEL_TRANSLATIONS);

                // REPLACE each slide as its translations arrive
                let mut done = 0usize;
                while let Some((position, result)) = translations.next().await {
                    let slide_index = targets[position];
                    match result {
                        Ok(texts) => {
                            if let Some(mut parts) = slides[position].take() {
                                let mut sink = TextSink::replace(texts);
                                let stored = walk_slide(&mut parts, &mut sink, &walk_opts)
                                    .and_then(|_| package.store_slide(&parts));
                                if let Err(e) = stored {
                                    warn!(slide = slide_index, error = %e, "slide replacement failed");
                                    task.error = Some(format!("slide {}: {}", slide_index, e));
                                }
                            }
                        }
                        Err(e) => {
                            warn!(slide = slide_index, error = %e, "slide translation failed");
                            task.error = Some(format!("slide {}: {}", slide_index, e));
                        }
                    }
                    done += 1;
                    if total > 0 {
                        task.progress = done as f64 / total as f64;
                    }
                    yield Ok(task.clone());
                }
            } else {
                let mut done = 0usize;
                for &index in &targets {
                    if let Err(e) =
                        translate_slide(&mut package, &slide_names[index], &translator, &walk_opts)
                            .await
                    {
                        warn!(slide = index, error = %e, "slide translation failed");
                        task.error = Some(format!("slide {}: {}", index, e));
                    }
                    done += 1;
                    task.progress = done as f64 / total as f64;
                    yield Ok(task.clone());
                }
            }

            // translate the file name, then write the mutated package
            let input_name =
                input_path.file_name().and_then(|name| name.to_str()).unwrap_or("translated.pptx");
            let output_name = match translator.translate(input_name).await {
                Ok(name) if !name.is_empty() => name,
                Ok(_) => input_name.to_string(),
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            if let Err(e) = std::fs::create_dir_all(&output_dir) {
                yield Err(e.into());
                return;
            }
            let output_path = output_dir.join(&output_name);
            if let Err(e) = package.save(&output_path) {
                yield Err(e);
                return;
            }

            task.output_file_path = Some(output_path.display().to_string());
            info!(output = %output_path.display(), "presentation saved");
            yield Ok(task.clone());
        })
    }
}

/// One slide's EXTRACT pass: parsed parts plus its text units in walk order.
fn load_and_extract(
    package: &PptxPackage,
    part_name: &str,
    opts: &WalkOptions,
) -> Result<(SlideParts, Vec<String>)> {
    let mut parts = package.load_slide(part_name)?;
    let mut sink = TextSink::extract();
    walk_slide(&mut parts, &mut sink, opts)?;
    Ok((parts, sink.into_texts()))
}

/// Sequential per-slide pipeline: extract, translate, replace, store.
async fn translate_slide(
    package: &mut PptxPackage,
    part_name: &str,
    translator: &TextTranslator,
    opts: &WalkOptions,
) -> Result<()> {
    let (mut parts, texts) = load_and_extract(package, part_name, opts)?;

    let mut translated = Vec::with_capacity(texts.len());
    for text in texts {
        translated.push(translator.translate(&text).await?);
    }

    let mut sink = TextSink::replace(translated);
    walk_slide(&mut parts, &mut sink, opts)?;
    package.store_slide(&parts)
}
