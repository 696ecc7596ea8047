use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use ag_core::{
    Article, ArticleRequest, ChatModel, ContentFetcher, GeneratedArticle, Result, SearchProvider,
    SeoMetadata,
};
use ag_inference::{ArticleComposer, SeoComposer};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::context::ContextAggregator;

/// The steps of a full generation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    GatherContext,
    ComposeArticle,
    ComposeSeo,
    Render,
}

impl Stage {
    fn emoji(&self) -> &'static str {
        match self {
            Stage::GatherContext => "📚",
            Stage::ComposeArticle => "📝",
            Stage::ComposeSeo => "🔎",
            Stage::Render => "🎨",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::GatherContext => "gather context",
            Stage::ComposeArticle => "compose article",
            Stage::ComposeSeo => "compose SEO",
            Stage::Render => "render HTML",
        };
        f.write_str(name)
    }
}

async fn run_stage<T, F>(stage: Stage, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let started = Instant::now();
    info!("{} Starting stage: {}", stage.emoji(), stage);
    let result = work.await;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => info!(elapsed_ms, "✅ Finished stage: {}", stage),
        Err(e) => error!(elapsed_ms, "❌ Stage {} failed: {}", stage, e),
    }
    result
}

/// Chains context gathering, article and SEO composition, and rendering.
///
/// Stages run strictly in order; nothing is kept between runs.
#[derive(Clone)]
pub struct ArticlePipeline {
    context: ContextAggregator,
    article_composer: ArticleComposer,
    seo_composer: SeoComposer,
}

impl ArticlePipeline {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        search: Arc<dyn SearchProvider>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            context: ContextAggregator::new(fetcher, search),
            article_composer: ArticleComposer::new(model.clone()),
            seo_composer: SeoComposer::new(model),
        }
    }

    #[instrument(skip(self), fields(run_id = %Uuid::new_v4()))]
    pub async fn generate_article(&self, query: &str, url: Option<&str>) -> Result<Article> {
        self.compose_article(query, url).await
    }

    #[instrument(skip_all, fields(run_id = %Uuid::new_v4(), title = %article.title))]
    pub async fn generate_seo(&self, article: &Article) -> Result<SeoMetadata> {
        self.compose_seo(article).await
    }

    #[instrument(skip_all, fields(run_id = %Uuid::new_v4(), query = %request.query))]
    pub async fn generate_full_article(
        &self,
        request: &ArticleRequest,
    ) -> Result<GeneratedArticle> {
        info!("🦗 Generating full article for \"{}\"", request.query);
        let article = self
            .compose_article(&request.query, request.url.as_deref())
            .await?;
        let seo = self.compose_seo(&article).await?;
        let html = run_stage(Stage::Render, async { Ok(Self::render_html(&article, &seo)) }).await?;
        Ok(GeneratedArticle { article, seo, html })
    }

    async fn compose_article(&self, query: &str, url: Option<&str>) -> Result<Article> {
        let context = run_stage(Stage::GatherContext, async {
            Ok(self.context.gather(query, url).await)
        })
        .await?;
        run_stage(Stage::ComposeArticle, self.article_composer.compose(query, &context)).await
    }

    async fn compose_seo(&self, article: &Article) -> Result<SeoMetadata> {
        run_stage(Stage::ComposeSeo, self.seo_composer.compose(article)).await
    }

    pub fn render_html(article: &Article, seo: &SeoMetadata) -> String {
        ag_render::render_html(article, seo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubFetcher, StubSearch};
    use ag_inference::models::DummyModel;
    use std::sync::Mutex;
    use tracing::instrument::WithSubscriber;
    use tracing::span;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Records the name of every span opened with a `run_id` field.
    #[derive(Clone, Default)]
    struct RunSpans(Arc<Mutex<Vec<&'static str>>>);

    impl<S: tracing::Subscriber> Layer<S> for RunSpans {
        fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
            if attrs.metadata().fields().field("run_id").is_some() {
                self.0.lock().unwrap().push(attrs.metadata().name());
            }
        }
    }

    fn pipeline(fetcher: StubFetcher, search: StubSearch) -> (ArticlePipeline, Arc<DummyModel>) {
        let model = Arc::new(DummyModel::new());
        (
            ArticlePipeline::new(Arc::new(fetcher), Arc::new(search), model.clone()),
            model,
        )
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::GatherContext.to_string(), "gather context");
        assert_eq!(Stage::Render.to_string(), "render HTML");
    }

    #[tokio::test]
    async fn test_generate_article_with_empty_context() {
        let (pipeline, model) = pipeline(StubFetcher::new(), StubSearch::returning(&[]));

        let article = pipeline.generate_article("solar panels", None).await.unwrap();
        assert_eq!(article.title, "Understanding solar panels");

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Additional context: \n"));
    }

    #[tokio::test]
    async fn test_generate_article_embeds_context() {
        let fetcher = StubFetcher::new()
            .page("https://seed.com", "Seed paragraph.")
            .page("https://1.com", "Search paragraph.");
        let (pipeline, model) = pipeline(fetcher, StubSearch::returning(&["https://1.com"]));

        pipeline
            .generate_article("solar panels", Some("https://seed.com"))
            .await
            .unwrap();
        assert!(model.prompts()[0].contains("Seed paragraph.\n\nSearch paragraph."));
    }

    #[tokio::test]
    async fn test_generate_full_article() {
        let (pipeline, model) = pipeline(StubFetcher::new(), StubSearch::throttled());
        let request = ArticleRequest {
            query: "heat pumps".to_string(),
            url: None,
        };

        let generated = pipeline.generate_full_article(&request).await.unwrap();
        assert_eq!(generated.article.title, "Understanding heat pumps");
        assert_eq!(generated.seo.title, "Understanding heat pumps");
        assert_eq!(
            generated.html,
            ArticlePipeline::render_html(&generated.article, &generated.seo)
        );
        assert!(generated.html.contains("<h1>Understanding heat pumps</h1>"));
        assert_eq!(model.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_full_article_runs_under_one_run_id() {
        let (pipeline, _model) = pipeline(StubFetcher::new(), StubSearch::returning(&[]));
        let request = ArticleRequest {
            query: "heat pumps".to_string(),
            url: None,
        };
        let spans = RunSpans::default();
        let subscriber = tracing_subscriber::registry().with(spans.clone());

        pipeline
            .generate_full_article(&request)
            .with_subscriber(subscriber)
            .await
            .unwrap();
        assert_eq!(*spans.0.lock().unwrap(), vec!["generate_full_article"]);
    }
}
