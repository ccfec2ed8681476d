use std::sync::Arc;
use std::time::Duration;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use contentgen::config::Settings;
use contentgen::mock::{MOCK_PROVIDER_NAME, SOCIAL_TEMPLATE_COUNT};
use contentgen::providers::{ClientOptions, ContentProvider, ProviderClient};
use contentgen::{
  parse_social_posts, split_posts, ContentRequest, ContentSafetyFilter
, GenerationFacade, Length, ProductDescParams, ProviderErrorKind
, ProviderId, SocialContentParams, POST_DIVIDER
};

fn init_logging()
{   let _ = env_logger::builder().is_test(true).try_init();
}

fn completion(content: &str) -> Value
{   json!({
      "id": "chatcmpl-1",
      "choices": [{
        "index": 0,
        "message": { "role": "assistant", "content": content },
        "finish_reason": "stop"
      }],
      "usage": {
        "prompt_tokens": 42,
        "completion_tokens": 7,
        "total_tokens": 49
      }
    })
}

/// Mount a chat-completions responder under `/v1`
async fn mount(server: &MockServer, response: ResponseTemplate, times: u64)
{   Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(response)
      .expect(times)
      .mount(server)
      .await;
}

fn client_for(id: ProviderId, settings: &Settings) -> ProviderClient
{   ProviderClient::new(
      settings.provider_descriptor(id)
    , ClientOptions::from_settings(settings)
    , Arc::new(ContentSafetyFilter::from_settings(settings).unwrap())
    ).unwrap()
}

fn product_request() -> ContentRequest
{   ContentRequest::ProductDesc(ProductDescParams
    {   product_name: "蓝牙耳机".to_string()
      , features: Some(vec!["降噪".to_string(), "长续航".to_string()])
      , style: None
    })
}

// ===== ProviderClient against a mock upstream =====

#[tokio::test]
async fn sends_chat_completion_with_bearer_key()
{   init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .and(header("Authorization", "Bearer sk-test"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(completion("Crisp sound, all day."))
      )
      .expect(1)
      .mount(&server)
      .await;

    let settings = Settings::from_pairs([
      ("OPENAI_API_KEY", "sk-test".to_string())
    , ("OPENAI_BASE_URL", format!("{}/v1", server.uri()))
    ]);
    let client = client_for(ProviderId::OpenAI, &settings);
    let result = client.generate(&product_request()).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.content(), Some("Crisp sound, all day."));
    assert_eq!(result.provider(), Some("OpenAI"));
    assert_eq!(result.usage().unwrap().total_tokens, 49);

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 2048);
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("降噪, 长续航"));
}

#[tokio::test]
async fn placeholder_key_never_reaches_the_network()
{   init_logging();
    let server = MockServer::start().await;
    mount(
      &server
    , ResponseTemplate::new(200).set_body_json(completion("unused"))
    , 0
    ).await;

    let settings = Settings::from_pairs([
      ("SILICONFLOW_API_KEY", "your-siliconflow-api-key".to_string())
    , ("SILICONFLOW_BASE_URL", format!("{}/v1", server.uri()))
    ]);
    let client = client_for(ProviderId::SiliconFlow, &settings);
    let err = client.generate(&product_request()).await.unwrap_err();

    assert_eq!(err.kind, ProviderErrorKind::NotConfigured);
    assert_eq!(err.provider, ProviderId::SiliconFlow);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn upstream_status_codes_map_to_error_kinds()
{   init_logging();
    let cases = [
      (401, ProviderErrorKind::Unauthorized)
    , (400, ProviderErrorKind::BadRequest)
    , (429, ProviderErrorKind::RateLimited)
    , (500, ProviderErrorKind::ServerError)
    , (418, ProviderErrorKind::Unknown)
    ];

    for (status, kind) in cases
    {   let server = MockServer::start().await;
        mount(
          &server
        , ResponseTemplate::new(status).set_body_json(json!({
            "error": { "message": "model not found" }
          }))
        , 1
        ).await;

        let settings = Settings::from_pairs([
          ("MOONSHOT_API_KEY", "mk-test".to_string())
        , ("MOONSHOT_BASE_URL", format!("{}/v1", server.uri()))
        ]);
        let err = client_for(ProviderId::Moonshot, &settings)
          .generate(&product_request())
          .await
          .unwrap_err();

        assert_eq!(err.kind, kind, "status {}", status);
        assert_eq!(err.status, Some(status));
        if status == 400
        {   assert!(err.message.contains("model not found"));
        }
    }
}

#[tokio::test]
async fn missing_completion_text_is_an_empty_response()
{   init_logging();
    let server = MockServer::start().await;
    mount(
      &server
    , ResponseTemplate::new(200).set_body_json(json!({ "choices": [] }))
    , 1
    ).await;

    let settings = Settings::from_pairs([
      ("OPENAI_API_KEY", "sk-test".to_string())
    , ("OPENAI_BASE_URL", format!("{}/v1", server.uri()))
    ]);
    let err = client_for(ProviderId::OpenAI, &settings)
      .generate(&product_request())
      .await
      .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::EmptyResponse);
}

#[tokio::test]
async fn slow_upstream_times_out_as_network_failure()
{   init_logging();
    let server = MockServer::start().await;
    mount(
      &server
    , ResponseTemplate::new(200)
        .set_body_json(completion("too late"))
        .set_delay(Duration::from_secs(3))
    , 1
    ).await;

    let settings = Settings::from_pairs([
      ("OPENAI_API_KEY", "sk-test".to_string())
    , ("OPENAI_BASE_URL", format!("{}/v1", server.uri()))
    , ("AI_REQUEST_TIMEOUT", "200".to_string())
    ]);
    let err = client_for(ProviderId::OpenAI, &settings)
      .generate(&product_request())
      .await
      .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Network);
}

#[tokio::test]
async fn output_is_masked_then_truncated()
{   init_logging();
    let server = MockServer::start().await;
    let text = "最好的耳机，音质清晰。续航长久，佩戴舒适，适合通勤和运动使用，一次购买长久陪伴";
    mount(
      &server
    , ResponseTemplate::new(200).set_body_json(completion(text))
    , 1
    ).await;

    let settings = Settings::from_pairs([
      ("SILICONFLOW_API_KEY", "sf-test".to_string())
    , ("SILICONFLOW_BASE_URL", format!("{}/v1", server.uri()))
    , ("AI_MAX_CONTENT_LENGTH", "20".to_string())
    , ("AI_BANNED_TERMS", "最好".to_string())
    ]);
    let result = client_for(ProviderId::SiliconFlow, &settings)
      .generate(&product_request())
      .await
      .unwrap();
    let content = result.content().unwrap();

    assert!(!content.contains("最好"));
    assert!(content.starts_with("***的耳机"));
    assert!(content.chars().count() <= 20 + 3);
}

#[tokio::test]
async fn social_limit_scales_with_post_count()
{   init_logging();
    let server = MockServer::start().await;
    let posts = ["第一条内容 #秋季", "第二条内容 #促销"]
      .join(&format!("\n{}\n", POST_DIVIDER));
    mount(
      &server
    , ResponseTemplate::new(200).set_body_json(completion(&posts))
    , 1
    ).await;

    let settings = Settings::from_pairs([
      ("OPENAI_API_KEY", "sk-test".to_string())
    , ("OPENAI_BASE_URL", format!("{}/v1", server.uri()))
    , ("AI_MAX_CONTENT_LENGTH", "20".to_string())
    ]);
    let request = ContentRequest::SocialContent(SocialContentParams
    {   platform: "instagram".to_string()
      , topic: "秋季促销".to_string()
      , style: None
      , count: Some(2)
    });
    let result = client_for(ProviderId::OpenAI, &settings)
      .generate(&request)
      .await
      .unwrap();

    let parsed = parse_social_posts(result.content().unwrap(), 2);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].hashtags, vec!["促销"]);
}

#[tokio::test]
async fn oversized_length_setting_is_not_fatal()
{   init_logging();
    let server = MockServer::start().await;
    let posts = ["秋意浓 #秋季", "好价来袭 #促销"]
      .join(&format!("\n{}\n", POST_DIVIDER));
    mount(
      &server
    , ResponseTemplate::new(200).set_body_json(completion(&posts))
    , 1
    ).await;

    let facade = GenerationFacade::from_settings(Settings::from_pairs([
      ("AI_PROVIDER", "openai".to_string())
    , ("OPENAI_API_KEY", "sk-test".to_string())
    , ("OPENAI_BASE_URL", format!("{}/v1", server.uri()))
    , ("AI_MAX_CONTENT_LENGTH", u64::MAX.to_string())
    ])).unwrap();
    let result = facade
      .generate_social_content("weibo", "秋季促销", None, Some(2))
      .await
      .unwrap();

    assert_eq!(result.provider(), Some("OpenAI"));
    assert_eq!(result.content(), Some(posts.as_str()));
}

// ===== Facade and fallback chain =====

#[tokio::test]
async fn rate_limited_primary_falls_through_to_next_provider()
{   init_logging();
    let limited = MockServer::start().await;
    mount(&limited, ResponseTemplate::new(429), 1).await;
    let healthy = MockServer::start().await;
    mount(
      &healthy
    , ResponseTemplate::new(200).set_body_json(completion("限时特惠，立即抢购！"))
    , 1
    ).await;

    let facade = GenerationFacade::from_settings(Settings::from_pairs([
      ("AI_PROVIDER", "siliconflow".to_string())
    , ("SILICONFLOW_API_KEY", "sf-test".to_string())
    , ("SILICONFLOW_BASE_URL", format!("{}/v1", limited.uri()))
    , ("MOONSHOT_API_KEY", "mk-test".to_string())
    , ("MOONSHOT_BASE_URL", format!("{}/v1", healthy.uri()))
    ])).unwrap();

    let result = facade
      .generate_marketing_copy("月饼礼盒", Some("上班族"), None, Some(Length::Short))
      .await
      .unwrap();

    assert!(result.is_success());
    assert_eq!(result.provider(), Some("Moonshot"));
    assert_eq!(result.content(), Some("限时特惠，立即抢购！"));
}

#[tokio::test]
async fn every_provider_failing_ends_in_mock_content()
{   init_logging();
    let mut pairs = vec![("AI_PROVIDER".to_string(), "openai".to_string())];
    let mut servers = Vec::new();
    for (id, status) in [
      (ProviderId::SiliconFlow, 500)
    , (ProviderId::OpenAI, 401)
    , (ProviderId::Moonshot, 429)
    ]
    {   let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(status), 1).await;
        let prefix = id.env_prefix();
        pairs.push((format!("{}_API_KEY", prefix), "key".to_string()));
        pairs.push((format!("{}_BASE_URL", prefix), format!("{}/v1", server.uri())));
        servers.push(server);
    }

    let facade = GenerationFacade::from_settings(Settings::from_pairs(pairs))
      .unwrap();
    let result = facade
      .generate_product_desc("保温杯", None, Some("简约"))
      .await
      .unwrap();

    assert!(result.is_success());
    assert_eq!(result.provider(), Some(MOCK_PROVIDER_NAME));
    assert!(result.content().unwrap().contains("1. 高品质"));
    for server in &servers
    {   assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn no_configured_provider_serves_every_content_type()
{   init_logging();
    let facade = GenerationFacade::from_settings(Settings::from_pairs([
      ("OPENAI_API_KEY", "your-openai-api-key")
    ])).unwrap();
    assert!(!facade.is_configured());
    assert!(facade.provider_name().starts_with(MOCK_PROVIDER_NAME));

    for length in [Length::Short, Length::Medium, Length::Long]
    {   let result = facade
          .generate_marketing_copy("空气炸锅", None, Some("活泼"), Some(length))
          .await
          .unwrap();
        assert!(result.is_success());
        assert!(result.content().unwrap().contains("空气炸锅"));
    }

    let desc = facade
      .generate_product_desc(
        "空气炸锅"
      , Some(vec!["无油烹饪".to_string()])
      , None
      )
      .await
      .unwrap();
    assert!(desc.content().unwrap().contains("1. 无油烹饪"));

    let social = facade
      .generate_social_content("weibo", "新品上市", None, None)
      .await
      .unwrap();
    assert_eq!(split_posts(social.content().unwrap()).len(), 3);
}

#[tokio::test]
async fn unknown_platform_mock_posts_each_mention_topic()
{   init_logging();
    let facade = GenerationFacade::from_settings(Settings::default()).unwrap();
    let result = facade
      .generate_social_content("unknown-platform", "秋季促销", None, Some(5))
      .await
      .unwrap();

    let content = result.content().unwrap();
    let segments = split_posts(content);
    assert_eq!(segments.len(), 5usize.min(SOCIAL_TEMPLATE_COUNT));
    assert_eq!(content.matches(POST_DIVIDER).count(), segments.len() - 1);
    assert!(segments.iter().all(|s| s.contains("秋季促销")));
}

#[tokio::test]
async fn concurrent_requests_survive_a_provider_switch()
{   init_logging();
    let first = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(completion("from first")))
      .mount(&first)
      .await;
    let second = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(completion("from second")))
      .mount(&second)
      .await;

    let facade = Arc::new(GenerationFacade::from_settings(Settings::from_pairs([
      ("AI_PROVIDER", "siliconflow".to_string())
    , ("SILICONFLOW_API_KEY", "sf".to_string())
    , ("SILICONFLOW_BASE_URL", format!("{}/v1", first.uri()))
    , ("OPENAI_API_KEY", "oa".to_string())
    , ("OPENAI_BASE_URL", format!("{}/v1", second.uri()))
    ])).unwrap());

    let mut handles = Vec::new();
    for i in 0..8
    {   let task_facade = facade.clone();
        handles.push(tokio::spawn(async move {
          task_facade
            .generate_social_content("x", &format!("topic {}", i), None, Some(1))
            .await
        }));
        if i == 3
        {   facade.switch_provider(ProviderId::OpenAI).unwrap();
        }
    }

    for handle in handles
    {   let result = handle.await.unwrap().unwrap();
        assert!(result.is_success());
        let provider = result.provider().unwrap();
        assert!(provider == "SiliconFlow" || provider == "OpenAI");
    }
    assert_eq!(facade.provider_name(), "OpenAI");
}
