//! Prompt rendering per content type, per backend locale

use crate::request::{
  ContentRequest, MarketingCopyParams, ProductDescParams
, SocialContentParams
};

/// Literal token separating multiple posts or versions.
/// Shared by every locale and by the mock generator.
pub const POST_DIVIDER: &str = "---DIVIDER---";

/// Language prompts are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale
{   Zh
  , En
}

/// Platform style hints, keyed by lowercase platform name
const PLATFORM_HINTS: &[(&[&str], &str, &str)] = &[
  ( &["weibo", "微博"]
  , "微博风格：简短有趣，适合话题互动，可带热门话题标签"
  , "Weibo style: short and fun, suited to topic interaction, may carry trending hashtags"
  )
, ( &["wechat", "微信"]
  , "微信公众号风格：深度有价值，适合知识分享"
  , "WeChat official account style: in-depth and valuable, suited to knowledge sharing"
  )
, ( &["douyin", "抖音"]
  , "抖音风格：短视频文案，活泼有趣，节奏快"
  , "Douyin style: short video captions, lively and fast paced"
  )
, ( &["xiaohongshu", "小红书"]
  , "小红书风格：真实体验分享，种草推荐，图文并茂"
  , "Xiaohongshu style: authentic experience sharing and recommendations, visual and textual"
  )
, ( &["twitter", "x"]
  , "推特风格：简洁有趣，适合话题互动，可带热门话题标签"
  , "Twitter style: concise and interesting, suitable for topic interaction, can include trending hashtags"
  )
, ( &["facebook"]
  , "Facebook风格：内容更详细，适合社群互动"
  , "Facebook style: more detailed, suitable for community engagement"
  )
, ( &["instagram"]
  , "Instagram风格：以视觉为主，配文简短吸睛"
  , "Instagram style: visual-focused, short and catchy captions"
  )
, ( &["linkedin"]
  , "领英风格：专业，适合行业洞察和专业内容"
  , "LinkedIn style: professional, suitable for industry insights and professional content"
  )
];

/// Style hint for a platform, case-insensitive, generic when unknown
pub fn platform_hint(platform: &str, locale: Locale) -> &'static str
{   let key = platform.trim().to_lowercase();
    let hit = PLATFORM_HINTS
      .iter()
      .find(|(names, _, _)| names.iter().any(|n| *n == key));
    match (hit, locale)
    {   (Some((_, zh, _)), Locale::Zh) => *zh
      , (Some((_, _, en)), Locale::En) => *en
      , (None, Locale::Zh) => "通用社交媒体风格"
      , (None, Locale::En) => "General social media style"
    }
}

/// Renders the user prompt for each content type
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder
{   locale: Locale
}

impl PromptBuilder
{   pub fn new(locale: Locale) -> Self
    {   PromptBuilder { locale }
    }

    pub fn locale(&self) -> Locale
    {   self.locale
    }

    pub fn render(&self, request: &ContentRequest) -> String
    {   match request
        {   ContentRequest::MarketingCopy(p) => self.marketing_copy(p)
          , ContentRequest::ProductDesc(p) => self.product_desc(p)
          , ContentRequest::SocialContent(p) => self.social_content(p)
        }
    }

    /// System message sent ahead of every prompt
    pub fn system_prompt(&self) -> &'static str
    {   match self.locale
        {   Locale::Zh => "你是一个专业的营销文案专家，擅长为中国中小商户创作吸引人的营销内容。文案要接地气、易懂、有感染力。"
          , Locale::En => "You are a professional marketing copywriter, expert at creating attractive marketing content for small and medium businesses."
        }
    }

    pub fn marketing_copy(&self, p: &MarketingCopyParams) -> String
    {   let (low, high) = p.length.char_range();
        match self.locale
        {   Locale::Zh => {
              let length_desc = match p.length
              {   crate::Length::Short => format!("简短有力，{}-{}字左右", low, high)
                , crate::Length::Medium => format!("适中，{}-{}字左右", low, high)
                , crate::Length::Long => format!("详细丰富，{}-{}字左右", low, high)
              };
              format!(
"请为以下产品撰写营销文案：

产品名称：{product}
目标受众：{audience}
文案风格：{tone}
长度要求：{length_desc}

要求：
1. 语言通俗易懂，适合中国普通消费者阅读
2. 突出产品核心卖点
3. 具有感染力和号召力
4. 可以适当使用emoji增加趣味性
5. 如果是短文案，最多生成3个版本供选择
{divider}

请直接输出文案内容，不要添加额外说明。"
              , product = p.product
              , audience = or_default(&p.target_audience, "目标用户")
              , tone = or_default(&p.tone, "专业、亲切")
              , length_desc = length_desc
              , divider = self.divider_rule(6)
              )
            }
          , Locale::En => {
              let length_desc = match p.length
              {   crate::Length::Short => format!("concise and powerful, about {}-{} characters", low, high)
                , crate::Length::Medium => format!("moderate, about {}-{} characters", low, high)
                , crate::Length::Long => format!("detailed and rich, about {}-{} characters", low, high)
              };
              format!(
"Please write marketing copy for the following product:

Product Name: {product}
Target Audience: {audience}
Copy Style: {tone}
Length Requirement: {length_desc}

Requirements:
1. Language should be easy to understand for average consumers
2. Highlight the product's core selling points
3. Be compelling and have a call to action
4. Can appropriately use emojis to add fun
5. If it's a short copy, generate up to 3 versions for selection
{divider}

Please directly output the copy content without additional explanations."
              , product = p.product
              , audience = or_default(&p.target_audience, "target users")
              , tone = or_default(&p.tone, "professional and friendly")
              , length_desc = length_desc
              , divider = self.divider_rule(6)
              )
            }
        }
    }

    pub fn product_desc(&self, p: &ProductDescParams) -> String
    {   let features = p.features.as_deref().unwrap_or(&[]);
        match self.locale
        {   Locale::Zh => format!(
"请为以下产品撰写吸引人的产品描述：

产品名称：{name}
产品特点：{features}
风格：{style}

要求：
1. 电商风格，富有吸引力
2. 突出产品优势和差异化特点
3. 语言生动有趣，激发购买欲望
4. 可以适当使用emoji
5. 结构清晰，包含核心特点和产品优势
{divider}

请直接输出产品描述内容，不要添加额外说明。"
            , name = p.product_name
            , features = if features.is_empty()
              {   "未指定".to_string()
              } else
              {   features.join("、")
              }
            , style = or_default(&p.style, "现代简约")
            , divider = self.divider_rule(6)
            )
          , Locale::En => format!(
"Please write an attractive product description for the following product:

Product Name: {name}
Product Features: {features}
Style: {style}

Requirements:
1. E-commerce style, attractive
2. Highlight product advantages and differentiation
3. Vivid and interesting language to stimulate purchase desire
4. Can appropriately use emojis
5. Clear structure, including core features and product advantages
{divider}

Please directly output the product description without additional explanations."
            , name = p.product_name
            , features = if features.is_empty()
              {   "not specified".to_string()
              } else
              {   features.join(", ")
              }
            , style = or_default(&p.style, "modern and simple")
            , divider = self.divider_rule(6)
            )
        }
    }

    pub fn social_content(&self, p: &SocialContentParams) -> String
    {   let count = p.count();
        let hint = platform_hint(&p.platform, self.locale);
        match self.locale
        {   Locale::Zh => format!(
"请为以下主题生成{count}条社交媒体发布内容：

主题：{topic}
平台：{platform}
风格：{style}
数量：{count}条

{hint}

要求：
1. 每条内容都要有吸引力的开头
2. 适合目标受众阅读
3. 可以适当添加相关话题标签（#话题）
4. 内容真实有趣，不生硬
{divider}

请直接输出内容，不要添加额外说明。"
            , count = count
            , topic = p.topic
            , platform = p.platform
            , style = or_default(&p.style, "亲切有趣")
            , hint = hint
            , divider = self.divider_rule(5)
            )
          , Locale::En => format!(
"Please generate {count} social media posts for the following topic:

Topic: {topic}
Platform: {platform}
Style: {style}
Quantity: {count} posts

{hint}

Requirements:
1. Each post should have an attractive opening
2. Suitable for target audience
3. Can appropriately add relevant topic hashtags (#topic)
4. Authentic and interesting content
{divider}

Please directly output the content without additional explanations."
            , count = count
            , topic = p.topic
            , platform = p.platform
            , style = or_default(&p.style, "friendly and interesting")
            , hint = hint
            , divider = self.divider_rule(5)
            )
        }
    }

    /// Numbered requirement telling the model how to separate entries
    fn divider_rule(&self, number: u32) -> String
    {   match self.locale
        {   Locale::Zh => format!(
              "{}. 如有多条内容或多个版本，每条之间用\"{}\"单独一行分隔"
            , number, POST_DIVIDER
            )
          , Locale::En => format!(
              "{}. If there are multiple posts or versions, separate each with \"{}\" on its own line"
            , number, POST_DIVIDER
            )
        }
    }
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str
{   value
      .as_deref()
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .unwrap_or(default)
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::Length;

    fn copy(length: Length) -> MarketingCopyParams
    {   MarketingCopyParams
        {   product: "保温杯".to_string()
          , target_audience: None
          , tone: None
          , length
        }
    }

    #[test]
    fn marketing_prompt_embeds_numeric_length_guidance()
    {   for locale in [Locale::Zh, Locale::En]
        {   let b = PromptBuilder::new(locale);
            assert!(b.marketing_copy(&copy(Length::Short)).contains("30-50"));
            assert!(b.marketing_copy(&copy(Length::Medium)).contains("100-200"));
            assert!(b.marketing_copy(&copy(Length::Long)).contains("300-500"));
        }
    }

    #[test]
    fn marketing_prompt_fills_defaults()
    {   let text = PromptBuilder::new(Locale::Zh).marketing_copy(&copy(Length::Medium));
        assert!(text.contains("产品名称：保温杯"));
        assert!(text.contains("目标受众：目标用户"));
        let text = PromptBuilder::new(Locale::En).marketing_copy(&copy(Length::Medium));
        assert!(text.contains("Target Audience: target users"));
    }

    #[test]
    fn platform_lookup_is_case_insensitive()
    {   assert_eq!(
          platform_hint("LinkedIn", Locale::En)
        , platform_hint("linkedin", Locale::En)
        );
        assert!(platform_hint("微博", Locale::Zh).starts_with("微博风格"));
        assert_eq!(
          platform_hint("unknown-platform", Locale::Zh)
        , "通用社交媒体风格"
        );
        assert_eq!(
          platform_hint("myspace", Locale::En)
        , "General social media style"
        );
    }

    #[test]
    fn every_renderer_names_the_divider()
    {   let requests = [
          ContentRequest::MarketingCopy(copy(Length::Short))
        , ContentRequest::ProductDesc(ProductDescParams
          {   product_name: "台灯".to_string()
            , features: Some(vec!["护眼".to_string(), "无频闪".to_string()])
            , style: None
          })
        , ContentRequest::SocialContent(SocialContentParams
          {   platform: "douyin".to_string()
            , topic: "开学季".to_string()
            , style: None
            , count: None
          })
        ];
        for locale in [Locale::Zh, Locale::En]
        {   let b = PromptBuilder::new(locale);
            for req in &requests
            {   assert!(b.render(req).contains(POST_DIVIDER));
            }
        }
    }

    #[test]
    fn social_prompt_uses_default_count_and_hint()
    {   let p = SocialContentParams
        {   platform: "Douyin".to_string()
          , topic: "开学季".to_string()
          , style: None
          , count: None
        };
        let text = PromptBuilder::new(Locale::Zh).social_content(&p);
        assert!(text.contains("生成3条"));
        assert!(text.contains("抖音风格"));
    }

    #[test]
    fn product_features_are_listed()
    {   let p = ProductDescParams
        {   product_name: "Desk lamp".to_string()
          , features: Some(vec!["eye care".to_string(), "no flicker".to_string()])
          , style: None
        };
        let text = PromptBuilder::new(Locale::En).product_desc(&p);
        assert!(text.contains("Product Features: eye care, no flicker"));
        assert!(text.contains("Style: modern and simple"));
    }
}
