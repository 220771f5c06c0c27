//! Fixed content tables: fortunes, lucky attributes, UI text and menu items.
//!
//! Per-language lists are parallel: index `i` means the same entry in both
//! languages. The lucky-number pool is shared by both languages.

/// Supported display languages. Korean is the default on every fresh load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ko, Language::En];

    /// The other supported language (used as the decode fallback and by the toggle).
    pub fn other(self) -> Language {
        match self {
            Language::Ko => Language::En,
            Language::En => Language::Ko,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Ko => "KO",
            Language::En => "EN",
        }
    }

    /// Value for the `lang` attribute of rendered fragments.
    pub fn html_lang(self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// A string available in both languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized {
    pub ko: &'static str,
    pub en: &'static str,
}

impl Localized {
    pub const fn new(ko: &'static str, en: &'static str) -> Self {
        Self { ko, en }
    }

    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::Ko => self.ko,
            Language::En => self.en,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckyColor {
    pub name: &'static str,
    pub hex: &'static str,
}

// ── Fortunes ───────────────────────────────────────────────────────

const FORTUNES_KO: [&str; 12] = [
    "따뜻한 커피 한 잔처럼,\n오늘 당신의 하루에도 기분 좋은 온기가 스며들 거예요.",
    "오랫동안 미뤄둔 일이 있다면 오늘이 시작하기 좋은 날이에요.\n첫 모금이 가장 향긋한 법이니까요.",
    "뜻밖의 사람에게서 반가운 소식이 들려올 거예요.\n답장은 미루지 마세요.",
    "조금 쓴 하루라도 괜찮아요.\n마지막 한 모금은 분명 달콤할 테니까요.",
    "오늘은 평소와 다른 메뉴를 골라보세요.\n작은 변화가 큰 행운을 부릅니다.",
    "당신의 작은 친절이 누군가의 하루를 바꿀 거예요.\n그 마음은 곧 당신에게 돌아옵니다.",
    "서두르지 않아도 괜찮아요.\n천천히 내린 커피가 더 깊은 맛을 내니까요.",
    "오늘 떠오르는 아이디어를 꼭 메모해 두세요.\n머지않아 빛을 볼 거예요.",
    "좋아하는 사람과 함께하는 시간이 행운을 두 배로 만들어 줄 거예요.",
    "잠시 쉬어 가도 괜찮은 날이에요.\n충전된 에너지가 내일을 밝혀 줄 거예요.",
    "기대하지 않았던 곳에서 작은 선물이 기다리고 있어요.",
    "오늘의 당신은 누구보다 빛나요.\n자신감을 가지고 한 걸음 내디뎌 보세요.",
];

const FORTUNES_EN: [&str; 12] = [
    "Like a warm cup of coffee,\na pleasant warmth will seep into your day today.",
    "If you have been putting something off, today is a good day to begin.\nThe first sip is always the most fragrant.",
    "Happy news will arrive from someone unexpected.\nDon't wait too long to reply.",
    "It's fine if today tastes a little bitter.\nThe last sip will surely be sweet.",
    "Try a different menu item today.\nA small change invites great luck.",
    "Your small kindness will change someone's day.\nThat warmth will soon come back to you.",
    "There's no need to rush.\nSlowly brewed coffee has a deeper taste.",
    "Write down the idea that comes to you today.\nIt will shine before long.",
    "Time spent with someone you like will double your luck.",
    "It's a good day to take a short break.\nThe energy you recharge will brighten tomorrow.",
    "A small gift is waiting for you somewhere you least expect.",
    "Today you shine brighter than anyone.\nTake a confident step forward.",
];

// ── Lucky attributes ───────────────────────────────────────────────

const COLORS_KO: [LuckyColor; 8] = [
    LuckyColor { name: "빨강", hex: "#E53935" },
    LuckyColor { name: "주황", hex: "#FB8C00" },
    LuckyColor { name: "노랑", hex: "#FDD835" },
    LuckyColor { name: "초록", hex: "#43A047" },
    LuckyColor { name: "파랑", hex: "#1E88E5" },
    LuckyColor { name: "보라", hex: "#8E24AA" },
    LuckyColor { name: "분홍", hex: "#EC407A" },
    LuckyColor { name: "갈색", hex: "#6D4C41" },
];

const COLORS_EN: [LuckyColor; 8] = [
    LuckyColor { name: "Red", hex: "#E53935" },
    LuckyColor { name: "Orange", hex: "#FB8C00" },
    LuckyColor { name: "Yellow", hex: "#FDD835" },
    LuckyColor { name: "Green", hex: "#43A047" },
    LuckyColor { name: "Blue", hex: "#1E88E5" },
    LuckyColor { name: "Purple", hex: "#8E24AA" },
    LuckyColor { name: "Pink", hex: "#EC407A" },
    LuckyColor { name: "Brown", hex: "#6D4C41" },
];

const PLACES_KO: [&str; 8] = [
    "창가 자리",
    "카운터 앞",
    "테라스",
    "책장 옆",
    "소파 자리",
    "2층 구석",
    "입구 근처",
    "큰 테이블",
];

const PLACES_EN: [&str; 8] = [
    "Window Seat",
    "By the Counter",
    "Terrace",
    "Next to the Bookshelf",
    "Sofa Corner",
    "Upstairs Nook",
    "Near the Entrance",
    "Big Table",
];

pub const LUCKY_NUMBERS: [i64; 12] = [1, 3, 5, 7, 8, 9, 11, 12, 17, 21, 24, 27];

pub fn fortunes(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ko => &FORTUNES_KO,
        Language::En => &FORTUNES_EN,
    }
}

pub fn lucky_colors(language: Language) -> &'static [LuckyColor] {
    match language {
        Language::Ko => &COLORS_KO,
        Language::En => &COLORS_EN,
    }
}

pub fn lucky_places(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ko => &PLACES_KO,
        Language::En => &PLACES_EN,
    }
}

// ── UI text ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    MainTitle,
    ViewFortuneButton,
    LoadingMessage,
    TodaysFortune,
    LuckyItems,
    LuckyColor,
    LuckyNumber,
    LuckyPlace,
    FeedbackPrompt,
    FeedbackToast,
    ShareToast,
    NewMenu,
    ShareButton,
    RetryButton,
    /// Contains a `{count}` placeholder.
    ViewCount,
    CafeInfo,
    CafeAddress,
}

impl TextKey {
    fn text(self) -> Localized {
        match self {
            TextKey::MainTitle => Localized::new("오늘의 커피 운세", "Today's Coffee Fortune"),
            TextKey::ViewFortuneButton => Localized::new("운세 보기", "See My Fortune"),
            TextKey::LoadingMessage => {
                Localized::new("커피를 내리며 운세를 읽는 중...", "Brewing your fortune...")
            }
            TextKey::TodaysFortune => Localized::new("오늘의 운세", "Today's Fortune"),
            TextKey::LuckyItems => Localized::new("행운의 아이템", "Lucky Items"),
            TextKey::LuckyColor => Localized::new("행운의 색", "Lucky Color"),
            TextKey::LuckyNumber => Localized::new("행운의 숫자", "Lucky Number"),
            TextKey::LuckyPlace => Localized::new("행운의 자리", "Lucky Spot"),
            TextKey::FeedbackPrompt => {
                Localized::new("오늘의 운세, 마음에 드셨나요?", "Did you like today's fortune?")
            }
            TextKey::FeedbackToast => {
                Localized::new("소중한 의견 감사합니다!", "Thanks for your feedback!")
            }
            TextKey::ShareToast => {
                Localized::new("링크가 복사되었어요!", "Link copied to clipboard!")
            }
            TextKey::NewMenu => Localized::new("새로운 메뉴", "New on the Menu"),
            TextKey::ShareButton => Localized::new("공유하기", "Share"),
            TextKey::RetryButton => Localized::new("다시 보기", "Try Again"),
            TextKey::ViewCount => Localized::new(
                "오늘 {count}명이 운세를 확인했어요",
                "{count} people checked their fortune today",
            ),
            TextKey::CafeInfo => Localized::new("카페 온도", "Cafe Ondo"),
            TextKey::CafeAddress => {
                Localized::new("서울특별시 마포구 연남로 12", "12 Yeonnam-ro, Mapo-gu, Seoul")
            }
        }
    }
}

/// Look up a UI string in the given language.
pub fn t(key: TextKey, language: Language) -> &'static str {
    key.text().get(language)
}

// ── Promotional menu ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub id: u32,
    pub image: &'static str,
    pub name: Localized,
    pub description: Localized,
}

pub const MENU_ITEMS: [MenuItem; 4] = [
    MenuItem {
        id: 1,
        image: "/assets/menu/hojicha-latte.webp",
        name: Localized::new("호지차 라떼", "Hojicha Latte"),
        description: Localized::new(
            "고소하게 볶은 호지차와 부드러운 우유",
            "Roasted hojicha with silky steamed milk",
        ),
    },
    MenuItem {
        id: 2,
        image: "/assets/menu/cream-cold-brew.webp",
        name: Localized::new("크림 콜드브루", "Cream Cold Brew"),
        description: Localized::new(
            "18시간 추출한 콜드브루 위에 달콤한 크림",
            "18-hour cold brew topped with sweet cream",
        ),
    },
    MenuItem {
        id: 3,
        image: "/assets/menu/yuzu-ade.webp",
        name: Localized::new("유자 에이드", "Yuzu Ade"),
        description: Localized::new(
            "상큼한 유자청과 탄산의 만남",
            "Bright yuzu syrup over sparkling water",
        ),
    },
    MenuItem {
        id: 4,
        image: "/assets/menu/basque-cheesecake.webp",
        name: Localized::new("바스크 치즈케이크", "Basque Cheesecake"),
        description: Localized::new(
            "겉은 그을리고 속은 촉촉한 치즈케이크",
            "Caramelized outside, creamy inside",
        ),
    },
];
