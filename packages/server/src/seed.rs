use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{image, post};

/// Sample posts inserted by `seed_sample_posts`.
struct SamplePost {
    title: &'static str,
    content: &'static str,
    excerpt: &'static str,
    category: &'static str,
    cover_image: Option<&'static str>,
    read_time: i32,
}

const SAMPLE_POSTS: &[SamplePost] = &[
    SamplePost {
        title: "Understanding Quantum Efficiency in Modern CMOS Sensors",
        content: "<h2>Introduction to Quantum Efficiency</h2>\
            <p>Quantum efficiency (QE) measures how effectively a sensor converts incident \
            photons into electrical signals: the ratio of electrons generated to photons \
            received at a given wavelength.</p>\
            <h3>Photon-to-Electron Conversion</h3>\
            <p>A photon striking the silicon substrate must carry enough energy to promote an \
            electron across the ~1.12 eV bandgap; wavelengths beyond roughly 1100nm cannot. \
            Back-side illumination, microlens design, and anti-reflective coatings all shape \
            the QE curve across the visible spectrum.</p>",
        excerpt: "How quantum mechanics governs the light-to-electron conversion in digital \
            sensors, and why quantum efficiency matters for low-light performance.",
        category: "digital",
        cover_image: Some(
            "https://images.unsplash.com/photo-1518837695005-2083093ee35b?w=800&h=600",
        ),
        read_time: 8,
    },
    SamplePost {
        title: "The Chemistry of Silver Halide Crystals",
        content: "<h2>The Foundation of Film Photography</h2>\
            <p>Silver halide crystals form the heart of photographic film. When light strikes \
            a crystal, photon absorption creates electron-hole pairs; electrons migrate to \
            sensitivity specks where silver atoms nucleate. A latent image forms with as few \
            as 4-6 silver atoms.</p>\
            <p>Emulsions combine silver bromide for sensitivity, silver chloride for faster \
            processing, and silver iodide for enhanced response.</p>",
        excerpt: "Deep dive into the photochemical processes that make film photography \
            possible, from exposure to development.",
        category: "film",
        cover_image: Some(
            "https://images.unsplash.com/photo-1526170375885-4d8ecf77b99f?w=600&h=400",
        ),
        read_time: 5,
    },
    SamplePost {
        title: "Chromatic Aberration: Physics vs. Digital Correction",
        content: "<h2>Understanding Chromatic Aberration</h2>\
            <p>Different wavelengths refract at slightly different angles through optical \
            elements. Longitudinal aberration focuses wavelengths at different distances; \
            lateral aberration shifts them across the frame off-axis. Modern lens designs \
            and in-camera correction each attack a different half of the problem.</p>",
        excerpt: "Understanding how different wavelengths of light focus at different points \
            and modern correction techniques.",
        category: "optics",
        cover_image: Some(
            "https://images.unsplash.com/photo-1635070041078-e363dbe005cb?w=600&h=400",
        ),
        read_time: 7,
    },
];

/// Insert the sample posts, but only into an empty post table.
pub async fn seed_sample_posts(db: &DatabaseConnection) -> Result<(), DbErr> {
    let existing = post::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now();
    for sample in SAMPLE_POSTS {
        let model = post::ActiveModel {
            title: Set(sample.title.to_string()),
            content: Set(sample.content.to_string()),
            excerpt: Set(sample.excerpt.to_string()),
            category: Set(sample.category.to_string()),
            cover_image: Set(sample.cover_image.map(str::to_string)),
            published: Set(true),
            read_time: Set(sample.read_time),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        model.insert(db).await?;
    }

    info!("Seeded {} sample posts", SAMPLE_POSTS.len());
    Ok(())
}

/// Create secondary indexes for the list/filter queries. Best-effort: a
/// failure is logged and startup continues.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // listPosts: ORDER BY created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_post_created")
        .table(post::Entity)
        .col(post::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    run_index_stmt(db, "idx_post_created", &stmt).await;

    // listPostsByCategory: WHERE category = ? ORDER BY created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_post_category_created")
        .table(post::Entity)
        .col(post::Column::Category)
        .col(post::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    run_index_stmt(db, "idx_post_category_created", &stmt).await;

    // listImagesByPost: WHERE post_id = ? ORDER BY created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_image_post_created")
        .table(image::Entity)
        .col(image::Column::PostId)
        .col(image::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    run_index_stmt(db, "idx_image_post_created", &stmt).await;

    Ok(())
}

async fn run_index_stmt(db: &DatabaseConnection, name: &str, stmt: &str) {
    match db.execute_unprepared(stmt).await {
        Ok(_) => {
            info!("Ensured index {} exists", name);
        }
        Err(e) => {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }
}
