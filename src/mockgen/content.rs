//! Synthetic profile and post content
//!
//! Template filling over small fixed vocabularies. Every function takes the
//! RNG explicitly so a seeded run is reproducible.

use rand::seq::IndexedRandom;
use rand::Rng;

pub const TAGS: &[&str] = &[
    "技术", "生活", "美食", "旅游", "电影", "音乐", "游戏", "运动", "读书", "摄影", "职场", "教育",
    "健康", "时尚", "宠物", "汽车", "财经", "科技", "艺术", "心理",
];

const INTERESTS: &[&str] = &["摄影", "美食", "旅行", "读书", "音乐", "电影", "运动", "写作", "绘画", "编程"];
const PROFESSIONS: &[&str] = &["程序员", "设计师", "产品经理", "自由职业者", "学生", "创业者"];
const FIELDS: &[&str] = &["互联网", "教育", "金融", "医疗", "文创", "科技"];
const STATUSES: &[&str] = &["在学习了", "在成长了", "在进步了", "在探索了"];
const CITIES: &[&str] = &[
    "北京", "上海", "广州", "深圳", "杭州", "成都", "南京", "武汉", "西安", "重庆", "苏州", "长沙",
];
const NAMES: &[&str] = &[
    "王芳", "李伟", "张敏", "刘洋", "陈静", "杨磊", "赵婷", "黄强", "周杰", "吴霞", "徐明", "孙丽",
];

const PLACES: &[&str] = &["商场", "公园", "咖啡馆", "图书馆", "健身房", "餐厅", "电影院"];
const ACTIVITIES: &[&str] = &["购物", "运动", "阅读", "美食", "看电影", "听音乐会", "徒步"];
const FEELINGS: &[&str] = &["开心", "惊喜", "放松", "充实", "有趣", "难忘"];
const ITEMS: &[&str] = &["手机", "电脑", "相机", "耳机", "平板", "显示器", "键盘"];
const PRICES: &[&str] = &["1000", "2000", "3000", "5000", "8000", "10000"];
const FEATURES: &[&str] = &["性价比", "质量", "外观", "性能", "便携性", "续航"];
const STORES: &[&str] = &["餐厅", "咖啡馆", "书店", "甜品店", "小店"];
const WEATHERS: &[&str] = &["晴朗的", "阴天的", "下雨的", "多云的", "温暖的"];
const THOUGHTS: &[&str] = &["真是美好的一天！", "生活就是要这样！", "感觉整个人都放松了~", "推荐大家也来试试！"];
const TOPICS: &[&str] = &["职场经验", "学习方法", "生活技巧", "理财心得", "健康知识"];

/// Filler sentences standing in for free text
const SENTENCES: &[&str] = &[
    "周末的时候和朋友一起出门走了走。",
    "这段时间工作比较忙但是收获很多。",
    "坚持每天记录一点点进步。",
    "价格不算便宜但是体验确实不错。",
    "服务态度很好环境也很安静。",
    "下次还想再来一次。",
    "身边的朋友也都很喜欢。",
    "做计划比想象中更重要。",
    "慢慢来反而比较快。",
    "希望明年可以继续保持。",
];

const ADJECTIVES: &[&str] = &["happy", "quiet", "brave", "lucky", "sunny", "swift", "clever", "gentle"];
const NOUNS: &[&str] = &["panda", "river", "tiger", "cloud", "maple", "otter", "comet", "lotus"];
const MAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

const GRAVATAR_STYLES: &[&str] = &["identicon", "monsterid", "wavatar", "retro", "robohash"];
const ROBOHASH_SETS: &[&str] = &["set1", "set2", "set3", "set4"];
const AVATAR_COLORS: &[&str] = &["0096FF", "FF4C4C", "47B39C", "FFC54D", "8E44AD"];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Filler text of at most `max_chars` characters
pub fn filler_text<R: Rng + ?Sized>(rng: &mut R, max_chars: usize) -> String {
    let mut text = String::new();
    loop {
        let next = pick(rng, SENTENCES);
        if text.chars().count() + next.chars().count() > max_chars {
            break;
        }
        text.push_str(next);
    }
    if text.is_empty() {
        text = pick(rng, SENTENCES).chars().take(max_chars).collect();
    }
    text
}

pub fn username<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}_{}{}",
        pick(rng, ADJECTIVES),
        pick(rng, NOUNS),
        rng.random_range(100..10_000)
    )
}

pub fn email<R: Rng + ?Sized>(rng: &mut R, username: &str) -> String {
    format!("{username}@{}", pick(rng, MAIL_DOMAINS))
}

/// 32 hex characters, used as an avatar seed
fn hex_seed<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:032x}", rng.random::<u128>())
}

/// Avatar URL from one of three public generators
pub fn avatar_url<R: Rng + ?Sized>(rng: &mut R) -> String {
    let seed = hex_seed(rng);
    match rng.random_range(0..3) {
        0 => format!(
            "https://www.gravatar.com/avatar/{seed}?d={}&s=200",
            pick(rng, GRAVATAR_STYLES)
        ),
        1 => format!("https://robohash.org/{seed}?set={}", pick(rng, ROBOHASH_SETS)),
        _ => format!(
            "https://ui-avatars.com/api/?name={}&background={}&color=fff",
            pick(rng, NAMES),
            pick(rng, AVATAR_COLORS)
        ),
    }
}

pub fn bio<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.random_range(0..5) {
        0 => format!(
            "热爱{}和{}，{}人",
            pick(rng, INTERESTS),
            pick(rng, INTERESTS),
            pick(rng, CITIES)
        ),
        1 => format!("{}，{}爱好者", pick(rng, PROFESSIONS), pick(rng, INTERESTS)),
        2 => format!("专注于{}领域，{}", pick(rng, FIELDS), pick(rng, STATUSES)),
        3 => format!("{}上班族，喜欢{}", pick(rng, CITIES), pick(rng, INTERESTS)),
        _ => format!("{}，{}达人", pick(rng, STATUSES), pick(rng, INTERESTS)),
    }
}

pub fn post_content<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.random_range(0..5) {
        0 => format!(
            "最近在{}体验了一下{}，感觉真的很{}。{}大家有类似经历吗？",
            pick(rng, PLACES),
            pick(rng, ACTIVITIES),
            pick(rng, FEELINGS),
            filler_text(rng, 100)
        ),
        1 => format!(
            "分享一下关于{}的心得：{}希望对大家有帮助！",
            pick(rng, TOPICS),
            filler_text(rng, 200)
        ),
        2 => format!(
            "求推荐靠谱的{}！预算{}左右，主要考虑{}，有经验的朋友来说说吧~",
            pick(rng, ITEMS),
            pick(rng, PRICES),
            pick(rng, FEATURES)
        ),
        3 => format!(
            "今天在{}发现了一家很不错的{}，{}推荐大家也去试试！",
            pick(rng, PLACES),
            pick(rng, STORES),
            filler_text(rng, 50)
        ),
        _ => format!(
            "{}天气真适合{}，{}。{}",
            pick(rng, WEATHERS),
            pick(rng, ACTIVITIES),
            pick(rng, FEELINGS),
            pick(rng, THOUGHTS)
        ),
    }
}

/// Post title of at most 20 characters
pub fn title<R: Rng + ?Sized>(rng: &mut R) -> String {
    filler_text(rng, 20)
}

/// One to three distinct tags
pub fn tags<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let count = rng.random_range(1..=3);
    TAGS.choose_multiple(rng, count)
        .map(|t| (*t).to_string())
        .collect()
}

/// Prompt asking the text-generation service for a short bio
pub fn bio_prompt<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "请为一位来自{}、喜欢{}的{}写一句不超过30个字的个人简介",
        pick(rng, CITIES),
        pick(rng, INTERESTS),
        pick(rng, PROFESSIONS)
    )
}

/// Prompt asking the text-generation service for a forum post
pub fn post_prompt<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "请以第一人称写一段关于{}的论坛帖子，语气自然，不超过150个字",
        pick(rng, TOPICS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_title_is_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let t = title(&mut rng);
            assert!(!t.is_empty());
            assert!(t.chars().count() <= 20, "{t}");
        }
    }

    #[test]
    fn test_tags_are_distinct_and_known() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let picked = tags(&mut rng);
            assert!((1..=3).contains(&picked.len()));
            assert!(picked.iter().all(|t| TAGS.contains(&t.as_str())));
            let mut unique = picked.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), picked.len());
        }
    }

    #[test]
    fn test_avatar_urls_use_known_generators() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..30 {
            let url = avatar_url(&mut rng);
            assert!(
                url.starts_with("https://www.gravatar.com/avatar/")
                    || url.starts_with("https://robohash.org/")
                    || url.starts_with("https://ui-avatars.com/api/"),
                "{url}"
            );
        }
    }

    #[test]
    fn test_same_seed_same_content() {
        let a = post_content(&mut StdRng::seed_from_u64(4));
        let b = post_content(&mut StdRng::seed_from_u64(4));
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_email_uses_username() {
        let mut rng = StdRng::seed_from_u64(5);
        let name = username(&mut rng);
        assert!(name.is_ascii());
        assert!(email(&mut rng, &name).starts_with(&format!("{name}@")));
    }
}
