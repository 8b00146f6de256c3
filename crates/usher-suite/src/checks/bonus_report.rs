//! Bonus completion report check (two-step form).

use crate::checks::{choose_category, choose_from_combobox, ensure_open};
use crate::checks::submission::extract_submission_id;
use crate::definition::TargetDefinition;
use async_trait::async_trait;
use std::sync::Arc;
use usher_harness::{Check, CheckContext, PanelState};

const STEP1_CONTENT: &str = "發現新的電影特典資訊需要補充";
const MOVIE_TITLE: &str = "全知讀者視角";
const MOVIE_ENGLISH_TITLE: &str = "Omniscient Reader";
const CINEMA: &str = "威秀影城";
const BONUS_TYPE: &str = "首週購票禮";
const BONUS_NAME: &str = "限定版電影小卡";
const BONUS_DESCRIPTION: &str = "精美印刷的角色小卡，共6款隨機發放";
const ACQUISITION_METHOD: &str = "購買首週場次電影票即可獲得";
const PERIOD_START: &str = "2025-02-01";
const PERIOD_END: &str = "2025-02-07";
const QUANTITY_LIMIT: &str = "每人限兌1個，數量有限送完為止";
const SOURCE_TYPE: &str = "Facebook";
const SOURCE_URL: &str = "https://facebook.com/example";
const SOURCE_DESCRIPTION: &str = "威秀影城官方Facebook貼文";

/// Walks the two-step bonus completion form: category and content on
/// step one, the full bonus detail on step two, then submit and assert
/// on the success banner.
pub struct BonusReportCheck {
    definition: Arc<TargetDefinition>,
}

impl BonusReportCheck {
    /// Create the check for a definition.
    #[must_use]
    pub fn new(definition: Arc<TargetDefinition>) -> Self {
        Self { definition }
    }
}

#[async_trait]
impl Check for BonusReportCheck {
    fn name(&self) -> &str {
        "bonus-report-submission"
    }

    // A fresh form is needed after the basic submission's success state,
    // so this check starts from a closed panel and opens it itself.
    fn requires(&self) -> PanelState {
        PanelState::Closed
    }

    fn leaves(&self) -> PanelState {
        PanelState::Open
    }

    #[allow(clippy::too_many_lines)]
    async fn run(&self, cx: &mut CheckContext<'_>) -> usher_harness::Result<bool> {
        let definition = self.definition.clone();
        let widget = &definition.widget;
        let bonus = &widget.bonus;
        let browser = cx.browser();

        let opened = ensure_open(browser, &definition, cx.wait()).await;
        if !cx.record_probe("open fresh feedback form", opened) {
            return Ok(false);
        }

        let category = choose_category(
            browser,
            &definition,
            cx.wait(),
            &definition.categories.bonus_completion,
        )
        .await;
        if !cx.record_probe("select bonus completion category", category) {
            return Ok(false);
        }

        let content = browser.fill(&widget.content_input, STEP1_CONTENT).await;
        cx.record_probe("fill step 1 content", content);

        let next = browser.click_by_text("button", &widget.next_step_text).await;
        if !cx.record_probe("advance to bonus detail step", next) {
            return Ok(false);
        }

        let step2 = browser
            .wait_for_selector(&bonus.movie_title_input, cx.wait())
            .await;
        if !cx.record_probe("bonus detail step visible", step2) {
            return Ok(false);
        }

        let fields = [
            ("fill movie title", bonus.movie_title_input.as_str(), MOVIE_TITLE),
            (
                "fill movie english title",
                bonus.movie_english_title_input.as_str(),
                MOVIE_ENGLISH_TITLE,
            ),
            ("fill bonus name", bonus.bonus_name_input.as_str(), BONUS_NAME),
            (
                "fill bonus description",
                bonus.bonus_description_input.as_str(),
                BONUS_DESCRIPTION,
            ),
            (
                "fill acquisition method",
                bonus.acquisition_method_input.as_str(),
                ACQUISITION_METHOD,
            ),
            ("fill period start", bonus.period_start_input.as_str(), PERIOD_START),
            ("fill period end", bonus.period_end_input.as_str(), PERIOD_END),
            (
                "fill quantity limit",
                bonus.quantity_limit_input.as_str(),
                QUANTITY_LIMIT,
            ),
            ("fill source url", bonus.source_url_input.as_str(), SOURCE_URL),
            (
                "fill source description",
                bonus.source_description_input.as_str(),
                SOURCE_DESCRIPTION,
            ),
        ];

        let cinema = choose_from_combobox(
            browser,
            &definition,
            cx.wait(),
            &bonus.cinema_combobox_text,
            CINEMA,
        )
        .await;
        cx.record_probe("select cinema", cinema);

        let bonus_type = choose_from_combobox(
            browser,
            &definition,
            cx.wait(),
            &bonus.bonus_type_combobox_text,
            BONUS_TYPE,
        )
        .await;
        cx.record_probe("select bonus type", bonus_type);

        for (label, selector, value) in fields {
            let result = browser.fill(selector, value).await;
            cx.record_probe(label, result);
        }

        let source = choose_from_combobox(
            browser,
            &definition,
            cx.wait(),
            &bonus.source_combobox_text,
            SOURCE_TYPE,
        )
        .await;
        cx.record_probe("select source type", source);

        let submit = browser
            .click_by_text("button", &widget.bonus_submit_text)
            .await;
        if !cx.record_probe("submit bonus report", submit) {
            return Ok(false);
        }

        let banner = browser
            .wait_for_text(&definition.messages.success_marker, cx.wait())
            .await;
        if cx.record_probe("success banner", banner) {
            let id_text = browser
                .text_of(&definition.messages.submission_id_element)
                .await
                .unwrap_or_default();
            let id = extract_submission_id(&id_text);
            cx.observe("submission id", id.is_some(), id);
        }

        Ok(cx.probes_passed())
    }
}
