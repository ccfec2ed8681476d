//! Deterministic template generator used in mock mode

use log::{debug, info};
use crate::prompt::POST_DIVIDER;
use crate::request::{
  ContentRequest, GenerationResult, Length, MarketingCopyParams
, ProductDescParams, SocialContentParams
};

/// Provider label carried by mock results
pub const MOCK_PROVIDER_NAME: &str = "Mock";

/// Number of distinct social post templates
pub const SOCIAL_TEMPLATE_COUNT: usize = 5;

/// Generates content shaped like a real provider's, without network
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

impl MockGenerator
{   pub fn new() -> Self
    {   MockGenerator
    }

    /// Always succeeds
    pub fn generate(&self, request: &ContentRequest) -> GenerationResult
    {   info!("Generating {} with mock templates", request.content_type());
        let content = match request
        {   ContentRequest::MarketingCopy(p) => self.marketing_copy(p)
          , ContentRequest::ProductDesc(p) => self.product_desc(p)
          , ContentRequest::SocialContent(p) => self.social_content(p)
        };
        GenerationResult::success(content, MOCK_PROVIDER_NAME, None)
    }

    pub fn marketing_copy(&self, p: &MarketingCopyParams) -> String
    {   let product = &p.product;
        let audience = text_or(&p.target_audience, "目标用户");
        let tone = text_or(&p.tone, "专业");
        match p.length
        {   Length::Short => format!(
              "{product} - 为{audience}打造的优质选择！立即体验，让生活更美好。"
            )
          , Length::Medium => format!(
"【{product}】专为{audience}设计

采用先进技术和优质材料，为您带来卓越的使用体验。{tone}的风格，让每一次使用都成为享受。

立即购买，开启品质生活新篇章！"
            )
          , Length::Long => format!(
"【重磅推荐】{product}

您是否在为寻找优质的{audience}产品而烦恼？我们为您带来了完美的解决方案！

为什么选择{product}？
✓ 品质卓越：精选材料，精湛工艺
✓ {tone}风格：符合现代审美
✓ 用户至上：贴心服务，售后无忧

{audience}的明智之选，让每一次选择都值得期待。

立即行动，让{product}成为您生活中的一部分！"
            )
        }
    }

    pub fn product_desc(&self, p: &ProductDescParams) -> String
    {   let name = &p.product_name;
        let style = text_or(&p.style, "现代简约");
        let defaults = ["高品质", "易使用", "耐用性强"];
        let features: Vec<&str> = match p.features.as_deref()
        {   Some(list) if !list.is_empty() => {
              list.iter().map(|f| f.as_str()).collect()
            }
          , _ => defaults.to_vec()
        };
        let feature_list = features
          .iter()
          .enumerate()
          .map(|(i, f)| format!("{}. {}", i + 1, f))
          .collect::<Vec<_>>()
          .join("\n");

        format!(
"{name}

{name}是一款精心打造的优质产品，采用{style}设计理念，为您带来卓越的使用体验。

【核心特点】
{feature_list}

【产品优势】
- 品质保证：严格的质量控制，确保每一件产品都符合高标准
- 设计精美：{style}风格，彰显品位
- 实用性强：满足日常使用需求
- 性价比高：优质优价，物超所值

{name}，让品质生活触手可及。"
        )
    }

    /// `count` posts (capped at [`SOCIAL_TEMPLATE_COUNT`]) joined by the divider
    pub fn social_content(&self, p: &SocialContentParams) -> String
    {   let topic = &p.topic;
        let style = text_or(&p.style, "活泼");
        let templates = [
          format!(
"🔔 【{topic}】

{style}来袭！✨

还在为{topic}发愁吗？快来了解一下吧！

#{topic} #智享AI #内容创作"
          )
        , format!(
"📢 分享一个关于{topic}的小技巧：

1. 先了解需求
2. 选择合适的方案
3. 持续优化改进

你学到了吗？💡

#{topic} #技巧分享 #学习笔记"
          )
        , format!(
"🎉 今日{topic}推荐！

{style}的内容来啦～

感兴趣的小伙伴快来评论区聊聊吧！

#{topic} #推荐 #互动"
          )
        , format!(
"💡 {topic}小百科：

知识点get✓

{style}的方式，让你的{topic}更出色！

#{topic} #知识分享 #成长"
          )
        , format!(
"✨ {topic}，你值得拥有！

{style}呈现，让每一天都充满可能。

让我们一起探索{topic}的无限可能吧！

#{topic} #探索 #品质生活"
          )
        ];

        let count = (p.count() as usize).clamp(1, SOCIAL_TEMPLATE_COUNT);
        debug!("Mock social content for {}: {} posts", p.platform, count);
        let separator = format!("\n\n{}\n\n", POST_DIVIDER);
        templates[..count].join(separator.as_str())
    }
}

fn text_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str
{   value
      .as_deref()
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .unwrap_or(default)
}
