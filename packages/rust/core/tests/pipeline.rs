//! End-to-end conversion: an in-memory .docx goes in, a content bundle
//! comes out.

use docpress_core::{convert_document, ConvertConfig, SilentProgress};
use docpress_docx::test_support::build_docx;
use docpress_shared::AppConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn heading(level: u8, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading{level}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

fn list_item(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

fn bold_para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>{text}</w:t></w:r></w:p>"#)
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 120, 200]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[tokio::test]
async fn converts_a_full_document_into_a_bundle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/porch.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .set_body_bytes(png_bytes()),
        )
        .mount(&server)
        .await;

    let hero_para = r#"<w:p><w:r><w:t>[hero image] </w:t></w:r><w:hyperlink r:id="rId1"><w:r><w:t>porch photo</w:t></w:r></w:hyperlink></w:p>"#;

    let mut body = String::new();
    // navigation block, terminated by the footer marker heading
    body.push_str(&heading(2, "Navigation (All Pages)"));
    body.push_str(&para("Services"));
    body.push_str(&list_item("Drain Cleaning"));
    body.push_str(&list_item("Duct Sealing"));
    body.push_str(&heading(1, "Footer (All Pages)"));
    // home page with tags and a service box
    body.push_str(&heading(1, "Home Page"));
    body.push_str(hero_para);
    body.push_str(&para("[para_subheader] Fast local service"));
    body.push_str(&para("[cta] Call 555-555-5555"));
    body.push_str(&heading(2, "How Can We Help?"));
    body.push_str(&para("[p] Pick a service below"));
    body.push_str(&para("Water Heater Repair"));
    body.push_str(&para("Sewer Line Repair"));
    body.push_str(&heading(2, "Why Choose Us"));
    body.push_str(&para("Because we answer the phone at 2am."));
    // second page
    body.push_str(&heading(1, "About Page"));
    body.push_str(&para("We have served the area for twenty years."));
    // reviews section
    body.push_str(&heading(1, "Customer Reviews"));
    body.push_str(&bold_para("\"Great service!\" - Jane D. (Plumbing)"));

    let docx = build_docx(&body, &[("rId1", &format!("{}/porch.png", server.uri()))]);

    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("site-content.docx");
    std::fs::write(&input, docx).unwrap();
    let output_dir = tmp.path().join("bundle");

    let config = ConvertConfig {
        input,
        output_dir: output_dir.clone(),
        app: AppConfig::default(),
    };

    let result = convert_document(&config, &SilentProgress).await.unwrap();

    assert_eq!(result.pages_written, 2);
    assert_eq!(result.reviews, 1);
    assert!(result.has_navigation);
    assert!(result.has_services);
    assert_eq!(result.image_log.len(), 1);
    assert!(result.image_log[0].written);

    // home post
    let home = std::fs::read_to_string(output_dir.join("_posts/2001-01-01-home.md")).unwrap();
    assert!(home.starts_with("---\nlayout: post-sidebar\ntitle: Home\n"));
    assert!(home.contains("  image: home\n"));
    assert!(home.contains("      paragraph: Fast local service\n"));
    assert!(home.contains("        - cta-link: 'tel:{{ site.phone }}'"));
    assert!(home.contains("## Why Choose Us"));
    assert!(home.contains("Because we answer the phone at 2am."));

    // about post
    let about = std::fs::read_to_string(output_dir.join("_posts/2001-01-01-about.md")).unwrap();
    assert!(about.contains("title: About\n"));
    assert!(about.contains("We have served the area for twenty years."));

    // navigation export
    let nav = std::fs::read_to_string(output_dir.join("_data/navigation.yml")).unwrap();
    assert!(nav.contains("- text: Services\n  href: \"#\"\n  dropdown:\n"));
    assert!(nav.contains("        - text: Drain Cleaning\n          href: /services/drain-cleaning/\n"));
    assert!(nav.contains("        - text: Duct Sealing\n          href: /services/duct-sealing/\n"));

    // reviews data file
    let reviews = std::fs::read_to_string(output_dir.join("_data/reviews.yml")).unwrap();
    assert!(reviews.contains("text: Great service!"));
    assert!(reviews.contains("source: Jane D."));
    assert!(reviews.contains("service: (Plumbing)"));

    // services data file
    let services = std::fs::read_to_string(output_dir.join("_data/services.yml")).unwrap();
    assert!(services.contains("heading: How Can We Help?"));
    assert!(services.contains("sub_heading: Pick a service below"));
    assert!(services.contains("permalink: /services/water-heater-repair/"));
    assert!(services.contains("permalink: /services/sewer-line-repair/"));

    // transcoded hero image
    let webp = std::fs::read(output_dir.join("img/home.webp")).unwrap();
    assert_eq!(&webp[0..4], b"RIFF");
    assert_eq!(&webp[8..12], b"WEBP");
}

#[tokio::test]
async fn image_failures_do_not_fail_the_conversion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut body = String::new();
    body.push_str(&heading(1, "Footer (All Pages)"));
    body.push_str(&heading(1, "Home Page"));
    body.push_str(&para(&format!(
        "[hero image] {}/missing.png",
        server.uri()
    )));
    body.push_str(&heading(2, "Overview"));
    body.push_str(&para("Plenty of body content here."));

    let docx = build_docx(&body, &[]);
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("doc.docx");
    std::fs::write(&input, docx).unwrap();
    let output_dir = tmp.path().join("bundle");

    let config = ConvertConfig {
        input,
        output_dir: output_dir.clone(),
        app: AppConfig::default(),
    };

    let result = convert_document(&config, &SilentProgress).await.unwrap();

    assert_eq!(result.pages_written, 1);
    assert_eq!(result.image_log.len(), 1);
    assert!(!result.image_log[0].written);
    assert_eq!(result.image_log[0].detail.as_deref(), Some("HTTP 404"));
    // the post still references the missing image
    let home = std::fs::read_to_string(output_dir.join("_posts/2001-01-01-home.md")).unwrap();
    assert!(home.contains("  image: home\n"));
    assert!(!output_dir.join("img/home.webp").exists());
}

#[tokio::test]
async fn unreadable_document_is_the_only_fatal_input() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("not-a-docx.docx");
    std::fs::write(&input, b"plain bytes, not a zip container").unwrap();

    let config = ConvertConfig {
        input,
        output_dir: tmp.path().join("bundle"),
        app: AppConfig::default(),
    };

    let err = convert_document(&config, &SilentProgress).await.unwrap_err();
    assert!(matches!(err, docpress_shared::DocpressError::Document { .. }));
}

#[tokio::test]
async fn excluded_sections_are_dropped() {
    let mut body = String::new();
    body.push_str(&heading(1, "Footer (All Pages)"));
    body.push_str(&heading(1, "Header Section"));
    body.push_str(&para("Global header content that should not publish."));
    body.push_str(&heading(1, "Home Page"));
    body.push_str(&heading(2, "Overview"));
    body.push_str(&para("Real page content lives here."));

    let docx = build_docx(&body, &[]);
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("doc.docx");
    std::fs::write(&input, docx).unwrap();
    let output_dir = tmp.path().join("bundle");

    let config = ConvertConfig {
        input,
        output_dir: output_dir.clone(),
        app: AppConfig::default(),
    };

    let result = convert_document(&config, &SilentProgress).await.unwrap();

    assert_eq!(result.pages_written, 1);
    assert!(output_dir.join("_posts/2001-01-01-home.md").exists());
    assert!(!output_dir.join("_posts/2001-01-01-header-section.md").exists());
}
