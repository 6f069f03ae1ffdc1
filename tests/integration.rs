use fengshui_art::{
    ai::{IdeaService, ImageGenerationService, MockIdeaClient, MockImageClient, MockImageOutcome},
    app::{App, AppServices, Report},
    bazi::lookup_chart,
    checkout::{Checkout, CheckoutForm},
    elements::element_balance,
    models::{ArtIdea, Birthdate, FourPillarChart},
    pipeline::ArtGenerator,
    placeholder::{PlaceholderImages, PlaceholderPolicy},
    session::{Session, Step},
    Error,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn ideas() -> Vec<ArtIdea> {
    vec![
        ArtIdea {
            description: "A waterfall to temper the strong metal of the hour pillar.".to_string(),
            image_prompt: "traditional Chinese ink wash waterfall, misty pines".to_string(),
        },
        ArtIdea {
            description: "A phoenix rising to lift the fire element.".to_string(),
            image_prompt: "vibrant oil painting of a phoenix at sunrise".to_string(),
        },
        ArtIdea {
            description: "A bamboo grove for steady wood growth.".to_string(),
            image_prompt: "modern abstract bamboo grove in soft greens".to_string(),
        },
    ]
}

fn placeholders() -> PlaceholderImages {
    PlaceholderImages::new("https://picsum.photos".to_string(), PlaceholderPolicy::Nonce)
}

fn generator(ideas: MockIdeaClient, images: MockImageClient) -> ArtGenerator {
    ArtGenerator::new(Box::new(ideas), Box::new(images), placeholders())
}

#[tokio::test]
async fn test_end_to_end_birthdate_to_artworks() {
    let birthdate = Birthdate::new(1990, 5, 15, 8);
    let chart = lookup_chart(&birthdate).unwrap();
    assert_eq!(
        chart,
        FourPillarChart {
            year: "甲子".to_string(),
            month: "丙寅".to_string(),
            day: "戊辰".to_string(),
            hour: "庚申".to_string(),
        }
    );

    let art = generator(MockIdeaClient::new().with_ideas(ideas()), MockImageClient::new());
    let options = art.generate_art(&chart).await.unwrap();

    assert_eq!(options.len(), 3);
    for (option, idea) in options.iter().zip(ideas()) {
        assert_eq!(option.description, idea.description);
        assert!(option.is_generated());
    }
}

#[tokio::test]
async fn test_one_image_failure_yields_one_placeholder() {
    let chart = lookup_chart(&Birthdate::new(1990, 5, 15, 8)).unwrap();
    let images = MockImageClient::new()
        .with_outcome_for("phoenix", MockImageOutcome::Fail("safety block".to_string()));

    let options = generator(MockIdeaClient::new().with_ideas(ideas()), images)
        .generate_art(&chart)
        .await
        .unwrap();

    let generated = options.iter().filter(|o| o.is_generated()).count();
    assert_eq!(generated, 2);
    assert!(options[1].image.starts_with("https://picsum.photos/seed/"));
    assert!(options[1].image.contains("error1"));
    assert_eq!(options[1].description, ideas()[1].description);
}

#[tokio::test]
async fn test_total_image_outage_yields_three_placeholders() {
    let chart = lookup_chart(&Birthdate::new(1990, 5, 15, 8)).unwrap();
    let images = MockImageClient::new().with_default_outcome(MockImageOutcome::NoMedia);

    let options = generator(MockIdeaClient::new().with_ideas(ideas()), images)
        .generate_art(&chart)
        .await
        .unwrap();

    for (index, option) in options.iter().enumerate() {
        assert!(!option.is_generated());
        assert!(option.image.ends_with(&format!("{}/400/300", index)));
    }
}

#[tokio::test]
async fn test_wrong_idea_count_produces_no_output() {
    let chart = lookup_chart(&Birthdate::new(1990, 5, 15, 8)).unwrap();

    for count in [0, 2, 4] {
        let scripted: Vec<ArtIdea> = ideas().into_iter().cycle().take(count).collect();
        let images = MockImageClient::new();
        let images_probe = images.clone();

        let err = generator(MockIdeaClient::new().with_ideas(scripted), images)
            .generate_art(&chart)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::IdeaGeneration(_)));
        assert_eq!(images_probe.get_call_count(), 0);
    }
}

#[tokio::test]
async fn test_repeated_runs_keep_shape() {
    let app = App::with_services(AppServices {
        ideas: Box::new(MockIdeaClient::new()),
        images: Box::new(
            MockImageClient::new()
                .with_default_outcome(MockImageOutcome::Fail("flaky".to_string())),
        ),
        placeholders: placeholders(),
        checkout: Checkout::new(Duration::ZERO),
    });

    let birthdate = Birthdate::new(1990, 5, 15, 8);
    let first = app.run(birthdate).await.unwrap();
    let second = app.run(birthdate).await.unwrap();

    assert_eq!(first.artworks.len(), second.artworks.len());
    assert_eq!(first.chart, second.chart);
    // Failed renders draw a fresh nonce each time.
    assert!(first.artworks[0].image != second.artworks[0].image);
}

#[tokio::test]
async fn test_report_serializes_for_the_cli() {
    let app = App::with_services(AppServices {
        ideas: Box::new(MockIdeaClient::new().with_ideas(ideas())),
        images: Box::new(MockImageClient::new()),
        placeholders: placeholders(),
        checkout: Checkout::new(Duration::ZERO),
    });

    let report = app.run(Birthdate::new(1990, 5, 15, 8)).await.unwrap();
    let json = serde_json::to_string_pretty(&report).unwrap();
    assert!(json.contains("\"artworks\""));
    assert!(json.contains("\"wood\""));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    std::fs::write(&path, &json).unwrap();
    let parsed: Report = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.chart, report.chart);
    assert_eq!(parsed.elements, element_balance(&report.chart));
}

#[tokio::test]
async fn test_session_checkout_flow_with_app_services() {
    let app = App::with_services(AppServices {
        ideas: Box::new(MockIdeaClient::new().with_ideas(ideas())),
        images: Box::new(MockImageClient::new()),
        placeholders: placeholders(),
        checkout: Checkout::new(Duration::ZERO),
    });

    let mut session = Session::new();
    session.submit_birthdate(Birthdate::new(1985, 11, 3, 23)).unwrap();
    session.show_dashboard().unwrap();
    session.generate_art(app.generator()).await.unwrap();
    let selected = session.select_artwork(2).unwrap().clone();
    assert_eq!(selected.description, ideas()[2].description);

    let form = CheckoutForm {
        full_name: "Wei Zhang".to_string(),
        address: "8 Lucky Road".to_string(),
        city: "Harbour Town".to_string(),
        postal_code: "9999".to_string(),
        country: "Singapore".to_string(),
        card_number: "5555555555554444".to_string(),
        expiry_date: "12/30".to_string(),
        cvv: "9876".to_string(),
    };
    let confirmation = session.submit_checkout(app.checkout(), &form).await.unwrap();

    assert_eq!(confirmation.artwork_description, selected.description);
    assert_eq!(confirmation.card, "************4444");
    assert_eq!(session.step(), Step::Birthdate);
}

#[tokio::test]
async fn test_mock_services_are_usable_through_traits() {
    let chart = lookup_chart(&Birthdate::new(2000, 1, 1, 0)).unwrap();
    let idea_service: Box<dyn IdeaService> = Box::new(MockIdeaClient::new());
    let image_service: Box<dyn ImageGenerationService> = Box::new(MockImageClient::new());

    let generated = idea_service.generate_ideas(&chart).await.unwrap();
    assert_eq!(generated.len(), 3);

    let image = image_service
        .generate_image(&generated[0].image_prompt)
        .await
        .unwrap();
    assert!(image.unwrap().starts_with("data:image/png;base64,"));
}
