pub mod image;
pub mod pdf;
pub mod system;
pub mod text;
pub mod words;

use actix_web::web;

/// Register every `/api` endpoint
pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(text::summarize)
            .service(text::generate_questions)
            .service(text::generate)
            .service(image::process_image)
            .service(pdf::extract_pdf)
            .service(pdf::generate_pdf)
            .service(words::random_words)
            .service(words::random_words_by_category)
            .service(system::health),
    );
}
